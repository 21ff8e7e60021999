use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tui_arcade::core::{overlaps, CharGrid, FrameClock, Rect};
use tui_arcade::engine::games::TetrisGame;
use tui_arcade::engine::{GameModule, TetrisConfig, TickInput};
use tui_arcade::input::{ActionBuffer, HeldKeys};
use tui_arcade::types::Action;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn tetris_tick_and_input_paths_do_not_allocate() {
    // Setup outside counting so one-time allocations don't trip the gate.
    let t0 = Instant::now();
    let mut game = TetrisGame::new(TetrisConfig::default(), 1);
    game.reset_game();
    game.start_game(t0);
    let mut held = HeldKeys::track(&[Action::Down]);
    let mut queue = ActionBuffer::new(&[Action::Left, Action::Right]);
    let mut clock = FrameClock::new(3.0);
    let mut grid = CharGrid::new(20, 4);

    // Warm-up.
    clock.advance(t0, true);
    queue.push_key(Action::Left);
    let _ = game.on_tick(1.0, TickInput { held: &held, queue: &mut queue });
    let _ = game.on_key_down(Action::Primary, t0);

    let allocs = with_alloc_counting(|| {
        let mut now = t0;
        for i in 0..400u32 {
            now += Duration::from_millis(16);
            let dt = clock.advance(now, true).unwrap_or(1.0);

            queue.push_key(if i % 2 == 0 { Action::Left } else { Action::Right });
            if i % 50 == 0 {
                held.press(Action::Down, now);
            }
            held.expire(now);

            let lost = game
                .on_tick(dt, TickInput { held: &held, queue: &mut queue })
                .is_lost();
            let dropped = i % 7 == 0 && game.on_key_down(Action::Primary, now).is_lost();
            if lost || dropped {
                game.reset_game();
                game.start_game(now);
            }
        }

        // Primitive drawing and collision are allocation-free too.
        for i in 0..100 {
            grid.clear();
            grid.draw_text("SCORE", i as f32 * 0.1, 1.0);
            let _ = overlaps(&Rect::new(0.0, 0.0, 2.0, 2.0), &Rect::new(1.5, i as f32, 1.0, 1.0));
        }
    });

    assert_eq!(allocs, 0);
}
