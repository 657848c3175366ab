/// Link value terminating the run list
pub(crate) const NIL: usize = usize::MAX;

/// A span of input bytes that is still emitted as a single token
///
/// A node's index in the arena is the input position its span starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunNode {
    /// Next surviving node, or `NIL`
    pub next: usize,
    /// Node whose span this one repeats (meaningful when `count >= 2`)
    pub from: usize,
    /// Input bytes covered by this node
    pub count: usize,
    /// Anchored nodes stay literal entry points and are never merged away
    pub anchored: bool,
}

/// Arena of run nodes linked in input order
pub(crate) struct RunList {
    nodes: Vec<RunNode>,
}

impl RunList {
    /// One single-byte node per input position, linked in order
    pub fn new(len: usize) -> Self {
        let nodes = (0..len)
            .map(|i| RunNode {
                next: if i + 1 < len { i + 1 } else { NIL },
                from: 0,
                count: 1,
                anchored: false,
            })
            .collect();
        Self { nodes }
    }

    pub fn anchor(&mut self, index: usize) {
        self.nodes[index].anchored = true;
    }

    pub fn head(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    #[inline]
    pub fn next(&self, index: usize) -> Option<usize> {
        match self.nodes[index].next {
            NIL => None,
            next => Some(next),
        }
    }

    /// Collapse whole nodes starting at `start` into one match of `source`
    ///
    /// Consumes consecutive nodes while their summed count stays within
    /// `limit`. The merge only happens when at least two nodes collapse;
    /// returns the merged length in that case.
    pub fn try_merge(&mut self, source: usize, start: usize, limit: usize) -> Option<usize> {
        let mut node = start;
        let mut total = 0;
        let mut consumed = 0;
        while node != NIL {
            let run = &self.nodes[node];
            if run.anchored || total + run.count > limit {
                break;
            }
            total += run.count;
            node = run.next;
            consumed += 1;
        }

        if consumed < 2 {
            return None;
        }

        let head = &mut self.nodes[start];
        head.next = node;
        head.count = total;
        head.from = source;
        Some(total)
    }

    /// Surviving nodes in input order, with their arena index
    pub fn iter(&self) -> RunIter<'_> {
        RunIter { list: self, cursor: self.head() }
    }
}

pub(crate) struct RunIter<'a> {
    list: &'a RunList,
    cursor: Option<usize>,
}

impl<'a> Iterator for RunIter<'a> {
    type Item = (usize, &'a RunNode);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        self.cursor = self.list.next(index);
        Some((index, &self.list.nodes[index]))
    }
}
