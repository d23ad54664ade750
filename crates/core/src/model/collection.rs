//! Pure operations over a box collection.
//!
//! Each returns the new collection and never fails: an id that matches
//! nothing leaves the collection as it was.

use super::box_item::{BoxSize, ViewportBox};

pub fn find<'a>(boxes: &'a [ViewportBox], item_id: &str) -> Option<&'a ViewportBox> {
    boxes.iter().find(|item| item.item_id == item_id)
}

/// Appends `item`, unless its id is already taken.
pub fn appended(boxes: &[ViewportBox], item: ViewportBox) -> Vec<ViewportBox> {
    let mut next = boxes.to_vec();
    if find(boxes, &item.item_id).is_none() {
        next.push(item);
    }
    next
}

pub fn removed(boxes: &[ViewportBox], item_id: &str) -> Vec<ViewportBox> {
    boxes
        .iter()
        .filter(|item| item.item_id != item_id)
        .cloned()
        .collect()
}

pub fn resized(boxes: &[ViewportBox], item_id: &str, size: &BoxSize) -> Vec<ViewportBox> {
    boxes
        .iter()
        .map(|item| {
            if item.item_id == item_id {
                item.with_size(size.clone())
            } else {
                item.clone()
            }
        })
        .collect()
}

pub fn moved(
    boxes: &[ViewportBox],
    item_id: &str,
    position_x: i32,
    position_y: i32,
) -> Vec<ViewportBox> {
    boxes
        .iter()
        .map(|item| {
            if item.item_id == item_id {
                item.with_position(position_x, position_y)
            } else {
                item.clone()
            }
        })
        .collect()
}

/// Keeps the first box for every id. Lists written by this crate never
/// repeat ids, but a hand-edited store might.
pub fn dedup_ids(boxes: Vec<ViewportBox>) -> Vec<ViewportBox> {
    let mut seen = std::collections::HashSet::new();
    boxes
        .into_iter()
        .filter(|item| seen.insert(item.item_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ViewportBox {
        ViewportBox {
            item_id: id.into(),
            width: 320,
            height: 480,
            position_x: 0,
            position_y: 0,
            zoom: 1.0,
            device_code: None,
        }
    }

    #[test]
    fn remove_drops_only_the_match() {
        let boxes = vec![item("x"), item("y")];
        assert_eq!(removed(&boxes, "x"), vec![item("y")]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let boxes = vec![item("x"), item("y")];
        assert_eq!(removed(&boxes, "z"), boxes);
    }

    #[test]
    fn resize_touches_only_target_size_fields() {
        let mut target = item("y");
        target.position_x = 55;
        target.position_y = -3;
        let boxes = vec![item("x"), target, item("z")];
        let size = BoxSize {
            width: 1280,
            height: 720,
            zoom: 0.5,
            device_code: Some("laptop".into()),
        };

        let next = resized(&boxes, "y", &size);
        assert_eq!(next[0], boxes[0]);
        assert_eq!(next[2], boxes[2]);
        assert_eq!(next[1].item_id, "y");
        assert_eq!((next[1].position_x, next[1].position_y), (55, -3));
        assert_eq!(next[1].size(), size);
    }

    #[test]
    fn move_touches_only_target_position() {
        let boxes = vec![item("x"), item("y")];
        let next = moved(&boxes, "x", -100, 250);
        assert_eq!(next[1], boxes[1]);
        assert_eq!(next[0].size(), boxes[0].size());
        assert_eq!((next[0].position_x, next[0].position_y), (-100, 250));
    }

    #[test]
    fn updates_with_unknown_id_are_noops() {
        let boxes = vec![item("x")];
        assert_eq!(moved(&boxes, "nope", 1, 1), boxes);
        assert_eq!(resized(&boxes, "nope", &item("q").size()), boxes);
    }

    #[test]
    fn append_refuses_duplicate_ids() {
        let boxes = vec![item("x")];
        assert_eq!(appended(&boxes, item("x")), boxes);
        assert_eq!(appended(&boxes, item("y")).len(), 2);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut second = item("x");
        second.width = 999;
        let boxes = dedup_ids(vec![item("x"), item("y"), second]);
        assert_eq!(boxes, vec![item("x"), item("y")]);
    }
}
