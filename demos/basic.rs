use viewport_virtualizer::{Surface, Virtualizer, VirtualizerOptions};

/// A "surface" whose rows are plain strings of a fixed height.
struct Rows {
    next_id: usize,
}

struct Row {
    id: usize,
    label: String,
}

impl Surface for Rows {
    type Handle = Row;

    fn create_handle(&mut self) -> Row {
        self.next_id += 1;
        Row {
            id: self.next_id,
            label: String::new(),
        }
    }

    fn measure(&self, _handle: &Row, _index: usize) -> f64 {
        40.0
    }

    fn attach(&mut self, handle: &mut Row, index: usize, _position: usize) {
        handle.label = format!("row #{index}");
    }

    fn detach(&mut self, handle: &mut Row, _index: usize) {
        handle.label.clear();
    }
}

fn main() {
    let mut v = Virtualizer::new(VirtualizerOptions::uniform(100, 25.0));
    let mut rows = Rows { next_id: 0 };

    let first = v.recompute_visible_window(&mut rows, 0.0, 800.0);
    println!(
        "window={:?} leading={} trailing={} handles={}",
        first.window, first.leading_spacer, first.trailing_spacer, first.created_handles
    );

    // Second pass measures the attached rows (40 instead of the 25 estimate).
    let second = v.recompute_visible_window(&mut rows, first.scroll_offset, 800.0);
    println!(
        "corrected={} removed={:?} window={:?} total={}",
        second.corrections.len(),
        second.removed,
        second.window,
        v.total_extent()
    );

    if let Some(row) = v.handle(3) {
        println!("index 3 is shown by handle {} as {:?}", row.id, row.label);
    }
}
