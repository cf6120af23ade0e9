use std::fmt::{self, Debug};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single slot holding the most recently published value.
///
/// Subscribers get the current value (if any) as soon as they subscribe and every later
/// publication after that. A publication simply replaces the slot; nothing is queued.
pub struct Latest<T> {
    value: Option<Rc<T>>,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&Rc<T>)>)>,
    next_id: u64,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            value: None,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.value.clone()
    }

    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Rc<T>) + 'static,
    {
        if let Some(value) = &self.value {
            subscriber(value);
        }

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, value: T) -> Rc<T> {
        let value = Rc::new(value);
        self.value = Some(Rc::clone(&value));
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&value);
        }
        value
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Debug> Debug for Latest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Latest")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
