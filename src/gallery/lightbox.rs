/// Which asset, if any, is shown full-size. Navigation wraps at both ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lightbox {
    position: Option<usize>,
}

impl Lightbox {
    /// Show the asset at `position`. Ignored when it is out of range.
    pub(crate) fn open(&mut self, position: usize, len: usize) {
        if position < len {
            self.position = Some(position);
        }
    }

    pub(crate) fn close(&mut self) {
        self.position = None;
    }

    pub(crate) fn is_open(&self) -> bool {
        self.position.is_some()
    }

    pub(crate) fn position(&self) -> Option<usize> {
        self.position
    }

    pub(crate) fn next(&mut self, len: usize) {
        if let Some(pos) = self.position {
            self.position = (len > 0).then(|| (pos + 1) % len);
        }
    }

    pub(crate) fn prev(&mut self, len: usize) {
        if let Some(pos) = self.position {
            self.position = (len > 0).then(|| (pos + len - 1) % len);
        }
    }

    /// Keep the position valid after the collection shrank.
    pub(crate) fn clamp(&mut self, len: usize) {
        if let Some(pos) = self.position {
            self.position = (len > 0).then(|| pos.min(len - 1));
        }
    }
}
