//! Frame scheduling
//!
//! Components expose a single [`Tick::tick`]; the host owns one
//! [`AnimationLoop`] and calls [`AnimationLoop::step`] from its redraw
//! handler, so update order is fixed by the call site.

/// Something that advances by exactly one frame per call
pub trait Tick {
    fn tick(&mut self);
}

/// Owns the animated component and decides whether a host frame ticks it
pub struct AnimationLoop<T> {
    component: T,
    running: bool,
    frames: u64,
}

impl<T: Tick> AnimationLoop<T> {
    /// Starts in the running state
    pub fn new(component: T) -> Self {
        Self {
            component,
            running: true,
            frames: 0,
        }
    }

    /// Tick the component once if running. Returns whether it ticked.
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.component.tick();
        self.frames += 1;
        true
    }

    pub fn pause(&mut self) {
        if self.running {
            log::debug!("Animation paused at frame {}", self.frames);
        }
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.running {
            log::debug!("Animation resumed at frame {}", self.frames);
        }
        self.running = true;
    }

    /// Flip between running and paused, returning the new state
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks delivered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn component(&self) -> &T {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut T {
        &mut self.component
    }

    pub fn into_inner(self) -> T {
        self.component
    }
}
