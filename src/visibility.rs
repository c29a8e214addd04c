use crate::types::{LaidOutNode, NodeRect, Viewport};

/// Anything with an id and an axis-aligned bounding box can be visibility
/// tested. Implemented for both the wire rects and the final layout nodes.
pub trait Bounded {
    fn id(&self) -> &str;
    fn bounds(&self) -> (f64, f64, f64, f64);
}

impl Bounded for NodeRect {
    fn id(&self) -> &str {
        &self.id
    }

    fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }
}

impl Bounded for LaidOutNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Ids of the nodes whose bounding box intersects the buffer-expanded
/// viewport. O(n), runs on every scroll/pan/zoom; the only allocation is the
/// output vector itself (ids are borrowed).
pub fn filter_visible<'a, N: Bounded>(nodes: &'a [N], viewport: &Viewport) -> Vec<&'a str> {
    let left = viewport.x - viewport.buffer;
    let top = viewport.y - viewport.buffer;
    let right = viewport.x + viewport.width + viewport.buffer;
    let bottom = viewport.y + viewport.height + viewport.buffer;

    let mut visible = Vec::new();
    for node in nodes {
        let (x, y, width, height) = node.bounds();
        if x <= right && x + width >= left && y <= bottom && y + height >= top {
            visible.push(node.id());
        }
    }

    visible
}
