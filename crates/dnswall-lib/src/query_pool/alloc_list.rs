use super::QueryId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Link {
    /// Neighbour allocated earlier (towards the tail)
    next: Option<QueryId>,
    /// Neighbour allocated later (towards the head)
    prev: Option<QueryId>,
}

/// Doubly linked list of allocated ids, threaded through a fixed array of links
/// addressed by id. The head is the most recently allocated id, the tail is the
/// least recently allocated one.
pub(super) struct AllocList {
    links: Vec<Link>,
    head: Option<QueryId>,
    tail: Option<QueryId>,
    len: usize,
}

impl AllocList {
    pub(super) fn new(capacity: usize) -> Self {
        AllocList {
            links: vec![Link::default(); capacity],
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(super) fn clear(&mut self) {
        self.links.fill(Link::default());
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Records `id` as the most recently allocated one.
    ///
    /// `id` must not already be linked.
    pub(super) fn push_front(&mut self, id: QueryId) {
        let old_head = self.head;
        self.links[id as usize] = Link {
            next: old_head,
            prev: None,
        };
        match old_head {
            Some(old_head) => self.links[old_head as usize].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    /// Unlinks `id` from wherever it sits in the list.
    ///
    /// `id` must currently be linked.
    pub(super) fn remove(&mut self, id: QueryId) {
        let Link { next, prev } = std::mem::take(&mut self.links[id as usize]);
        match next {
            Some(next) => self.links[next as usize].prev = prev,
            // `id` is the tail
            None => self.tail = prev,
        }
        match prev {
            Some(prev) => self.links[prev as usize].next = next,
            // `id` is the head
            None => self.head = next,
        }
        self.len -= 1;
    }

    /// Walks from the tail towards the head, yielding at most `n` of the least
    /// recently allocated ids, oldest first.
    pub(super) fn oldest(&self, n: usize) -> impl Iterator<Item = QueryId> + '_ {
        std::iter::successors(self.tail, |&id| self.links[id as usize].prev).take(n)
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(super) fn iter(&self) -> impl Iterator<Item = QueryId> + '_ {
        std::iter::successors(self.head, |&id| self.links[id as usize].next)
    }
}
