//! Simple profiling using thread-local accumulators and drop guards
//!
//! Enable with environment variable: SNAKE3D_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Timed sections of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Pathfind,
    SelectFood,
    Director,
    PlanTick,
}

impl Category {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            Category::Pathfind => 0,
            Category::SelectFood => 1,
            Category::Director => 2,
            Category::PlanTick => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Category::Pathfind => "Pathfinding",
            Category::SelectFood => "Food Selection",
            Category::Director => "Fallback Director",
            Category::PlanTick => "Tick Planning",
        }
    }

    fn all() -> [Category; Category::COUNT] {
        [
            Category::Pathfind,
            Category::SelectFood,
            Category::Director,
            Category::PlanTick,
        ]
    }
}

thread_local! {
    static LOCAL_TIME: RefCell<[u64; Category::COUNT]> = const { RefCell::new([0; Category::COUNT]) };
    static LOCAL_COUNT: RefCell<[usize; Category::COUNT]> = const { RefCell::new([0; Category::COUNT]) };
}

// Global aggregators
static GLOBAL_TIME: [AtomicU64; Category::COUNT] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_COUNT: [AtomicUsize; Category::COUNT] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("SNAKE3D_PROFILE").is_ok()
}

pub struct ProfileGuard {
    start: Instant,
    category: Category,
}

impl ProfileGuard {
    pub fn new(category: Category) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let idx = self.category.index();
        LOCAL_TIME.with(|t| t.borrow_mut()[idx] += elapsed_ns);
        LOCAL_COUNT.with(|c| c.borrow_mut()[idx] += 1);
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        let mut t = t.borrow_mut();
        for (idx, ns) in t.iter_mut().enumerate() {
            GLOBAL_TIME[idx].fetch_add(*ns, Ordering::Relaxed);
            *ns = 0;
        }
    });
    LOCAL_COUNT.with(|c| {
        let mut c = c.borrow_mut();
        for (idx, n) in c.iter_mut().enumerate() {
            GLOBAL_COUNT[idx].fetch_add(*n, Ordering::Relaxed);
            *n = 0;
        }
    });
}

/// Total nanoseconds and call count recorded globally for a category
pub fn totals(category: Category) -> (u64, usize) {
    let idx = category.index();
    (
        GLOBAL_TIME[idx].load(Ordering::Relaxed),
        GLOBAL_COUNT[idx].load(Ordering::Relaxed),
    )
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for category in Category::all() {
        let (time, count) = totals(category);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!("{}:", category.label());
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", count);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for idx in 0..Category::COUNT {
        GLOBAL_TIME[idx].store(0, Ordering::Relaxed);
        GLOBAL_COUNT[idx].store(0, Ordering::Relaxed);
    }
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
