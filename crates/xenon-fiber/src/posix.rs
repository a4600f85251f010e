//! POSIX backend: `getcontext`/`makecontext`/`swapcontext`.

use std::cell::Cell;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// Fiber entry point. Must eventually switch away; returning from the entry
/// ends the thread (the context has no successor link).
pub type FiberEntry = fn(usize);

struct FiberInner {
    context: libc::ucontext_t,
    stack: Vec<u8>,
    entry: Option<FiberEntry>,
    arg: usize,
    is_thread_fiber: bool,
}

thread_local! {
    static CURRENT: Cell<Option<NonNull<FiberInner>>> = const { Cell::new(None) };
}

/// Handle to a fiber. Copyable; the underlying state lives until
/// [`Fiber::destroy`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fiber {
    inner: NonNull<FiberInner>,
}

impl Fiber {
    /// Promote the calling thread into a fiber. Must be called once per
    /// thread before any [`Fiber::switch_to`]; the returned handle stands for
    /// the thread's original stack.
    pub fn convert_current_thread() -> Fiber {
        let mut inner = Box::new(FiberInner {
            context: unsafe { MaybeUninit::zeroed().assume_init() },
            stack: Vec::new(),
            entry: None,
            arg: 0,
            is_thread_fiber: true,
        });
        let rc = unsafe { libc::getcontext(&mut inner.context) };
        assert_eq!(rc, 0, "getcontext failed");
        let ptr = NonNull::from(Box::leak(inner));
        CURRENT.with(|c| c.set(Some(ptr)));
        Fiber { inner: ptr }
    }

    /// Allocate a fiber with its own stack; `entry(arg)` runs on first
    /// switch-to.
    pub fn create(stack_size: usize, entry: FiberEntry, arg: usize) -> Fiber {
        let mut inner = Box::new(FiberInner {
            context: unsafe { MaybeUninit::zeroed().assume_init() },
            stack: vec![0; stack_size],
            entry: Some(entry),
            arg,
            is_thread_fiber: false,
        });
        let rc = unsafe { libc::getcontext(&mut inner.context) };
        assert_eq!(rc, 0, "getcontext failed");
        inner.context.uc_stack.ss_sp = inner.stack.as_mut_ptr().cast();
        inner.context.uc_stack.ss_size = inner.stack.len();
        inner.context.uc_link = std::ptr::null_mut();
        // The trampoline reads entry/arg through the thread-local current
        // pointer, so no argument marshalling through makecontext.
        unsafe { libc::makecontext(&mut inner.context, trampoline, 0) };
        Fiber {
            inner: NonNull::from(Box::leak(inner)),
        }
    }

    /// Suspend the running fiber and resume `target`. Returns when another
    /// fiber later switches back to this one.
    pub fn switch_to(target: Fiber) {
        let from = CURRENT
            .with(|c| c.get())
            .expect("switch_to on a thread that was never converted to a fiber");
        CURRENT.with(|c| c.set(Some(target.inner)));
        unsafe {
            libc::swapcontext(&mut (*from.as_ptr()).context, &(*target.inner.as_ptr()).context);
        }
    }

    /// The fiber currently executing on this thread, if any.
    pub fn current() -> Option<Fiber> {
        CURRENT.with(|c| c.get()).map(|inner| Fiber { inner })
    }

    /// True for the handle produced by [`Fiber::convert_current_thread`].
    pub fn is_thread_fiber(self) -> bool {
        unsafe { (*self.inner.as_ptr()).is_thread_fiber }
    }

    /// Release the fiber's stack and state. Destroying a running fiber is a
    /// usage error, except for the thread fiber, which converts the thread
    /// back to ordinary execution.
    pub fn destroy(self) {
        let running = CURRENT.with(|c| c.get());
        if running == Some(self.inner) {
            assert!(
                self.is_thread_fiber(),
                "destroy called on the currently running fiber"
            );
            CURRENT.with(|c| c.set(None));
        }
        unsafe { drop(Box::from_raw(self.inner.as_ptr())) };
    }
}

extern "C" fn trampoline() {
    // CURRENT was repointed by switch_to before swapcontext landed here.
    let inner = CURRENT
        .with(|c| c.get())
        .expect("fiber trampoline entered with no current fiber");
    let (entry, arg) = unsafe {
        let inner = &*inner.as_ptr();
        (inner.entry, inner.arg)
    };
    if let Some(entry) = entry {
        entry(arg);
    }
}
