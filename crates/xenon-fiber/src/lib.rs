//! Cooperative fiber primitive.
//!
//! A fiber is a suspended unit of execution with its own stack. Switching is
//! explicit and synchronous and preserves the entire native call stack, which
//! is what lets recompiled code yield mid-function and resume exactly where
//! it left off — the original function call chain is still live on the
//! fiber's stack, so no register-save protocol is needed.
//!
//! One OS thread owns its fiber set: exactly one fiber per thread is running
//! at any time, and fibers never migrate across threads. Cancellation does
//! not exist at this layer; a guest that needs it models it as guest state.

#[cfg(unix)]
mod posix;

#[cfg(unix)]
pub use posix::{Fiber, FiberEntry};

#[cfg(test)]
mod tests {
    use super::Fiber;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Fiber entry functions cannot capture closures; tests communicate
    // through a thread-local main handle and a shared counter.
    thread_local! {
        static MAIN: Cell<Option<Fiber>> = const { Cell::new(None) };
    }
    static COUNT: AtomicUsize = AtomicUsize::new(0);
    static SEEN_ARG: AtomicUsize = AtomicUsize::new(0);

    fn main_fiber() -> Fiber {
        MAIN.with(|m| m.get()).unwrap()
    }

    fn counting_fiber(_arg: usize) {
        COUNT.fetch_add(1, Ordering::SeqCst); // first resume
        Fiber::switch_to(main_fiber());
        COUNT.fetch_add(1, Ordering::SeqCst); // second resume
        Fiber::switch_to(main_fiber());
    }

    fn arg_fiber(arg: usize) {
        SEEN_ARG.store(arg, Ordering::SeqCst);
        Fiber::switch_to(main_fiber());
    }

    #[test]
    fn round_trips_increment_counter() {
        COUNT.store(0, Ordering::SeqCst);
        let main = Fiber::convert_current_thread();
        MAIN.with(|m| m.set(Some(main)));
        let f = Fiber::create(256 * 1024, counting_fiber, 0);

        assert_eq!(COUNT.load(Ordering::SeqCst), 0);
        Fiber::switch_to(f);
        assert_eq!(COUNT.load(Ordering::SeqCst), 1); // fiber ran, switched back
        Fiber::switch_to(f);
        assert_eq!(COUNT.load(Ordering::SeqCst), 2); // fiber resumed after its switch point

        f.destroy();
        MAIN.with(|m| m.set(None));
        main.destroy();
    }

    #[test]
    fn entry_argument_is_delivered() {
        let main = Fiber::convert_current_thread();
        MAIN.with(|m| m.set(Some(main)));
        let f = Fiber::create(128 * 1024, arg_fiber, 0x1234_5678);

        Fiber::switch_to(f);
        assert_eq!(SEEN_ARG.load(Ordering::SeqCst), 0x1234_5678);

        f.destroy();
        MAIN.with(|m| m.set(None));
        main.destroy();
    }

    #[test]
    fn converted_thread_is_current() {
        let main = Fiber::convert_current_thread();
        assert!(Fiber::current().is_some());
        assert!(main.is_thread_fiber());
        main.destroy();
        assert!(Fiber::current().is_none());
    }
}
