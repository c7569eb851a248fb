// Example: a list whose visible rows change height on every "timer tick".
//
// Run with `RUST_LOG=viewport_virtualizer=debug cargo run --example resizing_list --features tracing`
// to see the corrections, removals and insertions of every pass.
use viewport_virtualizer::{Surface, Virtualizer, VirtualizerOptions};

const ACCEPTABLE_SIZES: [f64; 4] = [50.0, 100.0, 150.0, 200.0];
const VIEWPORT_HEIGHT: f64 = 800.0;

/// Rows whose real height lives in the surface, not in the virtualizer.
struct Stack {
    heights: Vec<f64>,
    created: usize,
    rng: u64,
}

struct Cell {
    shown: Option<usize>,
}

impl Stack {
    fn new(count: usize) -> Self {
        Self {
            heights: vec![ACCEPTABLE_SIZES[0]; count],
            created: 0,
            rng: 0x5eed,
        }
    }

    fn pick_size(&mut self) -> f64 {
        self.rng = self
            .rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ACCEPTABLE_SIZES[(self.rng >> 33) as usize % ACCEPTABLE_SIZES.len()]
    }

    fn step(&mut self, index: usize) {
        self.heights[index] = self.pick_size();
    }
}

impl Surface for Stack {
    type Handle = Cell;

    fn create_handle(&mut self) -> Cell {
        self.created += 1;
        Cell { shown: None }
    }

    fn measure(&self, handle: &Cell, index: usize) -> f64 {
        debug_assert_eq!(handle.shown, Some(index));
        self.heights[index]
    }

    fn attach(&mut self, handle: &mut Cell, index: usize, _position: usize) {
        handle.shown = Some(index);
    }

    fn detach(&mut self, handle: &mut Cell, _index: usize) {
        handle.shown = None;
    }
}

/// Recomputes until the size table stops changing, feeding the resolved offset back in like a
/// scroll view would after each layout pass.
fn layout(v: &mut Virtualizer<Cell>, stack: &mut Stack, mut top: f64) -> f64 {
    for _ in 0..16 {
        let up = v.recompute_visible_window(stack, top, VIEWPORT_HEIGHT);
        top = up.scroll_offset;
        if !up.has_changes() {
            let space_left = v.total_extent() - top - VIEWPORT_HEIGHT;
            println!(
                "settled: offset={top} window={:?} leading={} trailing={} space_left={space_left}",
                up.window, up.leading_spacer, up.trailing_spacer
            );
            break;
        }
    }
    top
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Deliberately wrong estimates: every row really is at least 50 tall.
    let mut v = Virtualizer::new(VirtualizerOptions::uniform(100, 25.0));
    let mut stack = Stack::new(100);

    let mut offset = layout(&mut v, &mut stack, 0.0);

    for tick in 0..5 {
        println!("tick {tick}: about to update cell sizes");
        let visible: Vec<usize> = v.attached_indexes().collect();
        for index in visible {
            stack.step(index);
            v.notify_size_changed(index);
        }
        offset = layout(&mut v, &mut stack, offset);

        // The user drags the list down a bit.
        v.invalidate_anchor();
        offset = layout(&mut v, &mut stack, offset + 120.0);
        println!("anchor after scroll: {:?}", v.anchor());
    }

    println!(
        "handles created={} pooled={} attached={}",
        stack.created,
        v.pool_len(),
        v.attached_len()
    );
}
