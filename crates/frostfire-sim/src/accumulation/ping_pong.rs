/// Which half of a [`PingPong`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Two resources with alternating read/write roles.
///
/// Exactly one slot is read while the other is written; [`swap`](Self::swap)
/// exchanges the roles without moving the resources.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: Slot,
}

impl<T> PingPong<T> {
    /// Starts with `a` as the read side.
    pub fn new(a: T, b: T) -> Self {
        Self { slots: [a, b], read: Slot::A }
    }

    pub fn read(&self) -> &T {
        &self.slots[self.read.index()]
    }

    pub fn write(&self) -> &T {
        &self.slots[self.read.other().index()]
    }

    pub fn write_mut(&mut self) -> &mut T {
        &mut self.slots[self.read.other().index()]
    }

    pub fn read_slot(&self) -> Slot {
        self.read
    }

    pub fn read_index(&self) -> usize {
        self.read.index()
    }

    pub fn swap(&mut self) {
        self.read = self.read.other();
    }

    /// Both slots as `(read, write)`.
    pub fn split_mut(&mut self) -> (&mut T, &mut T) {
        let [a, b] = &mut self.slots;
        match self.read {
            Slot::A => (a, b),
            Slot::B => (b, a),
        }
    }

    /// Both slots in storage order, independent of roles.
    pub fn both_mut(&mut self) -> &mut [T; 2] {
        &mut self.slots
    }

    pub fn get(&self, slot: Slot) -> &T {
        &self.slots[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_read_is_a() {
        let p = PingPong::new('a', 'b');
        assert_eq!(*p.read(), 'a');
        assert_eq!(*p.write(), 'b');
        assert_eq!(p.read_slot(), Slot::A);
    }

    #[test]
    fn read_is_a_iff_even_swaps() {
        let mut p = PingPong::new('a', 'b');
        for n in 1..=9 {
            p.swap();
            assert_eq!(*p.read() == 'a', n % 2 == 0, "after {n} swaps");
            assert_ne!(p.read(), p.write());
        }
    }

    #[test]
    fn split_mut_follows_roles() {
        let mut p = PingPong::new(1, 2);
        p.swap();
        let (r, w) = p.split_mut();
        assert_eq!((*r, *w), (2, 1));
        *w = 10;
        assert_eq!(*p.get(Slot::A), 10);
    }
}
