use std::cell::RefCell;
use std::rc::Rc;

use vizij_arrangement_core::routine::{task_fn, Delay, Sequence, WaitUntil};
use vizij_arrangement_core::{
    ConcurrentRoutine, Routine, RoutineState, Step, Task, TickClock, WaitGroup,
};

/// Context for these tests: a frame counter plus fixed frame time.
#[derive(Default)]
struct Frame {
    index: u32,
    dt: f32,
}

impl TickClock for Frame {
    fn delta_seconds(&self) -> f32 {
        self.dt
    }
}

/// Finishes on its `n`-th step.
struct Steps(u32);

impl Task<Frame> for Steps {
    fn step(&mut self, _cx: &mut Frame) -> Step<Frame> {
        self.0 = self.0.saturating_sub(1);
        if self.0 == 0 {
            Step::Done
        } else {
            Step::Pending
        }
    }
}

fn run_frames(routine: &mut ConcurrentRoutine<Frame>, cx: &mut Frame, max: u32) -> u32 {
    let mut frames = 0;
    while routine.advance(cx) {
        cx.index += 1;
        frames += 1;
        assert!(frames < max, "routine never finished");
    }
    frames + 1
}

/// it should complete a concurrent routine exactly when its slowest child does
#[test]
fn concurrent_completes_with_last_child() {
    let mut cx = Frame::default();
    let mut c = ConcurrentRoutine::new(vec![
        Routine::new(Steps(1)),
        Routine::new(Steps(4)),
        Routine::new(Steps(2)),
    ]);
    let frames = run_frames(&mut c, &mut cx, 20);
    assert_eq!(frames, 4);
    assert_eq!(c.state(), RoutineState::Complete);
    assert!(c
        .children()
        .iter()
        .all(|r| r.state() == RoutineState::Complete));
}

/// it should report nothing left to do after stop, and stop every child
#[test]
fn stopped_routines_stay_stopped() {
    let mut cx = Frame::default();
    let mut c = ConcurrentRoutine::new(vec![Routine::new(Steps(5)), Routine::new(Steps(5))]);
    assert!(c.advance(&mut cx));
    c.stop();
    assert_eq!(c.state(), RoutineState::Stopped);
    for _ in 0..3 {
        assert!(!c.advance(&mut cx));
    }
    assert!(c
        .children()
        .iter()
        .all(|r| r.state() == RoutineState::Stopped));
}

/// it should delegate to a yielded child and resume the parent afterwards
#[test]
fn nested_child_runs_before_parent_resumes() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut phase = 0;
    let parent_log = log.clone();
    let parent = task_fn(move |_cx: &mut Frame| {
        phase += 1;
        parent_log.borrow_mut().push(format!("parent:{phase}"));
        match phase {
            1 => {
                let child_log = parent_log.clone();
                let mut n = 0;
                Step::yield_task(task_fn(move |_cx: &mut Frame| {
                    n += 1;
                    child_log.borrow_mut().push(format!("child:{n}"));
                    if n == 3 {
                        Step::Done
                    } else {
                        Step::Pending
                    }
                }))
            }
            _ => Step::Done,
        }
    });
    let mut r = Routine::new(parent);
    let mut cx = Frame::default();
    let mut advances = 0;
    while r.advance(&mut cx) {
        advances += 1;
    }
    assert_eq!(
        *log.borrow(),
        vec!["parent:1", "child:1", "child:2", "child:3", "parent:2"]
    );
    // child runs in the yielding call and the parent resumes in the completing call
    assert_eq!(advances, 2);
}

/// it should stop a yielded child together with its parent
#[test]
fn stop_reaches_nested_child() {
    struct Flagged(Rc<RefCell<bool>>);
    impl Task<Frame> for Flagged {
        fn step(&mut self, _cx: &mut Frame) -> Step<Frame> {
            Step::Pending
        }
        fn stop(&mut self) {
            *self.0.borrow_mut() = true;
        }
    }

    let stopped = Rc::new(RefCell::new(false));
    let flag = stopped.clone();
    let mut once = Some(Flagged(flag));
    let parent = task_fn(move |_cx: &mut Frame| match once.take() {
        Some(child) => Step::yield_task(child),
        None => Step::Done,
    });
    let mut r = Routine::new(parent);
    let mut cx = Frame::default();
    assert!(r.advance(&mut cx));
    assert!(r.advance(&mut cx));
    r.stop();
    assert!(*stopped.borrow());
    assert_eq!(r.state(), RoutineState::Stopped);
}

/// it should balance joins and leaves and absorb extra leaves
#[test]
fn wait_group_counts_and_floors_at_zero() {
    let group = WaitGroup::new();
    for _ in 0..5 {
        group.join();
    }
    assert_eq!(group.count(), 5);
    for _ in 0..5 {
        group.leave();
    }
    assert!(group.is_empty());
    group.leave();
    assert!(group.is_empty());
    group.join();
    assert_eq!(group.count(), 1);
}

/// it should release waiters once every tracked task finishes
#[test]
fn wait_group_releases_after_tracked_tasks() {
    let group = WaitGroup::new();
    let mut workers = ConcurrentRoutine::new(vec![
        Routine::new(group.track(Steps(2))),
        Routine::new(group.track(Steps(3))),
    ]);
    let mut waiter: Routine<Frame> = Routine::new(group.wait());
    let mut cx = Frame::default();

    assert!(workers.advance(&mut cx));
    assert_eq!(group.count(), 2);
    assert!(waiter.advance(&mut cx));
    assert!(workers.advance(&mut cx));
    assert_eq!(group.count(), 1);
    assert!(waiter.advance(&mut cx));
    assert!(!workers.advance(&mut cx));
    assert!(group.is_empty());
    assert!(!waiter.advance(&mut cx));
}

/// it should keep the group joined when a tracked task is stopped early
#[test]
fn stopped_tracked_task_does_not_leave() {
    let group = WaitGroup::new();
    let mut r = Routine::new(group.track(Steps(10)));
    let mut cx = Frame::default();
    r.advance(&mut cx);
    assert_eq!(group.count(), 1);
    r.stop();
    assert_eq!(group.count(), 1);
}

/// it should chain delays, predicates and callbacks through a sequence
#[test]
fn sequence_of_building_blocks() {
    let fired = Rc::new(RefCell::new(None));
    let sink = fired.clone();
    let seq = Sequence::new()
        .then(Delay::seconds(0.3))
        .then(WaitUntil::new(|cx: &Frame| cx.index >= 5))
        .then(task_fn(move |cx: &mut Frame| {
            *sink.borrow_mut() = Some(cx.index);
            Step::Done
        }));
    let mut r = Routine::new(seq);
    let mut cx = Frame { index: 0, dt: 0.1 };
    while r.advance(&mut cx) {
        cx.index += 1;
        assert!(cx.index < 50);
    }
    assert_eq!(*fired.borrow(), Some(5));
}
