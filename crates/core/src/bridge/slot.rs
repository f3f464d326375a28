use std::sync::Mutex;

/// Single-value slot. Writers overwrite, readers see the latest value.
pub struct ResultSlot<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn set(&self, value: T) {
        *self.slot.lock().expect("ResultSlot poisoned") = Some(value);
    }

    pub fn get(&self) -> Option<T> {
        self.slot.lock().expect("ResultSlot poisoned").clone()
    }

    pub fn take(&self) -> Option<T> {
        self.slot.lock().expect("ResultSlot poisoned").take()
    }
}

impl<T: Clone> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_wins() {
        let slot = ResultSlot::new();
        slot.set(1);
        slot.set(2);
        assert_eq!(slot.get(), Some(2));
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.get(), None);
    }
}
