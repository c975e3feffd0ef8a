//! LRU Ordering Module
//!
//! Index-based doubly linked list that keeps cache entries in recency order.

/// Null link marker.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == LRU List ==
/// Doubly linked list stored in a growable arena.
///
/// Nodes live in a `Vec` and link to each other by slot index:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Freed slots are chained through `next` and reused by later pushes,
/// so the arena never grows past the peak number of live items.
#[derive(Debug)]
pub struct LruList<T> {
    nodes: Vec<Node<T>>,
    head: usize,
    tail: usize,
    free: usize,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item at the head and returns its slot.
    pub fn push_front(&mut self, item: T) -> usize {
        let slot = if self.free != NIL {
            let slot = self.free;
            self.free = self.nodes[slot].next;
            self.nodes[slot].item = Some(item);
            slot
        } else {
            self.nodes.push(Node {
                item: Some(item),
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        };

        self.link_front(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the item in `slot` as most recently used.
    pub fn move_to_front(&mut self, slot: usize) {
        if self.head == slot || !self.is_live(slot) {
            return;
        }
        self.detach(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Unlinks the item in `slot` and returns it. The slot is recycled.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        if !self.is_live(slot) {
            return None;
        }
        self.detach(slot);
        let item = self.nodes[slot].item.take();
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.free;
        self.free = slot;
        self.len -= 1;
        item
    }

    // == Peek Tail ==
    /// Slot of the least recently used item.
    pub fn tail(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.nodes.get(slot).and_then(|node| node.item.as_ref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.nodes.get_mut(slot).and_then(|node| node.item.as_mut())
    }

    // == Length ==
    /// Returns the number of linked items.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iterate ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn is_live(&self, slot: usize) -> bool {
        self.nodes
            .get(slot)
            .map(|node| node.item.is_some())
            .unwrap_or(false)
    }

    fn link_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }
}

/// Iterator over list items in recency order.
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.item.as_ref()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn contents(list: &LruList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_list_new() {
        let list: LruList<u32> = LruList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let mut list = LruList::new();

        list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        assert_eq!(list.len(), 3);
        assert_eq!(contents(&list), vec!["c", "b", "a"]);
        assert_eq!(list.get(list.tail().unwrap()), Some(&"a"));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = LruList::new();

        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        list.move_to_front(a);

        assert_eq!(contents(&list), vec!["a", "c", "b"]);
        assert_eq!(list.get(list.tail().unwrap()), Some(&"b"));
    }

    #[test]
    fn test_move_tail_then_middle() {
        let mut list = LruList::new();

        let a = list.push_front("a");
        let b = list.push_front("b");
        list.push_front("c");

        // push a, b, c then touch a, b: c is now the tail
        list.move_to_front(a);
        list.move_to_front(b);

        assert_eq!(contents(&list), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_head_is_noop() {
        let mut list = LruList::new();

        list.push_front("a");
        let b = list.push_front("b");
        list.move_to_front(b);

        assert_eq!(contents(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_middle_head_and_tail() {
        let mut list = LruList::new();

        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(contents(&list), vec!["c", "a"]);

        assert_eq!(list.remove(c), Some("c"));
        assert_eq!(contents(&list), vec!["a"]);

        assert_eq!(list.remove(a), Some("a"));
        assert!(list.is_empty());
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_remove_twice_returns_none() {
        let mut list = LruList::new();

        let a = list.push_front("a");
        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(a), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = LruList::new();

        let a = list.push_front("a");
        list.push_front("b");
        list.remove(a);

        let c = list.push_front("c");
        assert_eq!(c, a);
        assert_eq!(list.nodes.len(), 2);
        assert_eq!(contents(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut list = LruList::new();

        let slot = list.push_front(1);
        *list.get_mut(slot).unwrap() = 2;

        assert_eq!(list.get(slot), Some(&2));
    }
}
