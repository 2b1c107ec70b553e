//! Process and thread system calls of the teaching kernel.
//!
//! The kernel's scheduler and thread implementation live elsewhere; this
//! module only names the entry points it provides ([`Kernel`]) and performs
//! the argument fetching the syscall layer does before calling into it
//! ([`dispatch`]). Every call returns an `i32` the way the user-space stubs
//! expect: `-1` for failures, including missing arguments.
//!
//! | number | call            | returns                       |
//! |--------|-----------------|-------------------------------|
//! | 1      | `fork`          | child pid / 0 in child / -1   |
//! | 2      | `exit`          | does not return               |
//! | 3      | `wait`          | pid of reaped child / -1      |
//! | 6      | `kill`          | 0 / -1                        |
//! | 11     | `getpid`        | caller's pid                  |
//! | 12     | `sbrk`          | old break / -1                |
//! | 13     | `sleep`         | 0 / -1 if killed while asleep |
//! | 14     | `uptime`        | ticks since boot              |
//! | 22     | `yield`         | 0                             |
//! | 23     | `getlev`        | current queue level           |
//! | 24     | `setpriority`   | 0                             |
//! | 25     | `monopolize`    | 0                             |
//! | 26     | `thread_create` | 0 / -1                        |
//! | 27     | `thread_exit`   | does not return               |
//! | 28     | `thread_join`   | 0 / -1                        |

use log::{trace, warn};

/// Process id as seen by user programs.
pub type Pid = i32;

/// An address in the calling process's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPtr(pub u32);

impl From<i32> for UserPtr {
    fn from(raw: i32) -> Self {
        UserPtr(raw as u32)
    }
}

/// System call numbers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syscall {
    Fork = 1,
    Exit = 2,
    Wait = 3,
    Kill = 6,
    Getpid = 11,
    Sbrk = 12,
    Sleep = 13,
    Uptime = 14,
    Yield = 22,
    Getlev = 23,
    SetPriority = 24,
    Monopolize = 25,
    ThreadCreate = 26,
    ThreadExit = 27,
    ThreadJoin = 28,
}

impl TryFrom<i32> for Syscall {
    type Error = i32;

    fn try_from(number: i32) -> Result<Self, Self::Error> {
        Ok(match number {
            1 => Syscall::Fork,
            2 => Syscall::Exit,
            3 => Syscall::Wait,
            6 => Syscall::Kill,
            11 => Syscall::Getpid,
            12 => Syscall::Sbrk,
            13 => Syscall::Sleep,
            14 => Syscall::Uptime,
            22 => Syscall::Yield,
            23 => Syscall::Getlev,
            24 => Syscall::SetPriority,
            25 => Syscall::Monopolize,
            26 => Syscall::ThreadCreate,
            27 => Syscall::ThreadExit,
            28 => Syscall::ThreadJoin,
            other => return Err(other),
        })
    }
}

/// Kernel services behind the system calls.
///
/// Implemented by the kernel proper; scheduling policy is its own business.
pub trait Kernel {
    /// Duplicate the calling process. Child pid in the parent, 0 in the child, -1 on failure.
    fn fork(&mut self) -> Pid;
    /// Terminate the calling process.
    fn exit(&mut self);
    /// Wait for a child to exit; its pid, or -1 if there are no children.
    fn wait(&mut self) -> Pid;
    /// Mark `pid` as killed; 0 on success, -1 if no such process.
    fn kill(&mut self, pid: Pid) -> i32;
    fn getpid(&self) -> Pid;
    /// Grow (or shrink) the process memory by `delta` bytes; old size or -1.
    fn grow(&mut self, delta: i32) -> i32;

    /// Clock ticks since boot.
    fn ticks(&self) -> u32;
    /// Whether the calling process has been killed.
    fn killed(&self) -> bool;
    /// Block until the next clock tick.
    fn wait_tick(&mut self);

    /// Give up the CPU for one scheduling round.
    fn yield_now(&mut self);
    /// Queue level of the calling process.
    fn getlev(&self) -> i32;
    fn set_priority(&mut self, pid: Pid, level: i32);
    /// Ask for exclusive use of the CPU, authenticated by `password`.
    fn monopolize(&mut self, password: i32);

    /// Start a thread at `start_routine(arg)`, storing its handle at `thread`.
    fn thread_create(&mut self, thread: UserPtr, start_routine: UserPtr, arg: UserPtr) -> i32;
    fn thread_exit(&mut self, retval: UserPtr);
    /// Wait for `thread`, storing its return value at `retval`.
    fn thread_join(&mut self, thread: i32, retval: UserPtr) -> i32;
}

/// Integer arguments of the current system call, fetched by position.
pub trait SyscallArgs {
    /// The `n`th argument, or `None` if it cannot be fetched.
    fn int(&self, n: usize) -> Option<i32>;
}

impl SyscallArgs for [i32] {
    fn int(&self, n: usize) -> Option<i32> {
        self.get(n).copied()
    }
}

/// Decode and run system call `number`.
pub fn dispatch<K, A>(number: i32, args: &A, kernel: &mut K) -> i32
where
    K: Kernel + ?Sized,
    A: SyscallArgs + ?Sized,
{
    let call = match Syscall::try_from(number) {
        Ok(call) => call,
        Err(unknown) => {
            warn!("pid {}: unknown syscall {}", kernel.getpid(), unknown);
            return -1;
        }
    };
    trace!("pid {}: {:?}", kernel.getpid(), call);
    run(call, args, kernel).unwrap_or(-1)
}

fn run<K, A>(call: Syscall, args: &A, kernel: &mut K) -> Option<i32>
where
    K: Kernel + ?Sized,
    A: SyscallArgs + ?Sized,
{
    Some(match call {
        Syscall::Fork => kernel.fork(),
        Syscall::Exit => {
            kernel.exit();
            0
        }
        Syscall::Wait => kernel.wait(),
        Syscall::Kill => kernel.kill(args.int(0)?),
        Syscall::Getpid => kernel.getpid(),
        Syscall::Sbrk => {
            let old = kernel.grow(args.int(0)?);
            if old < 0 { -1 } else { old }
        }
        Syscall::Sleep => sleep(kernel, args.int(0)?),
        Syscall::Uptime => kernel.ticks() as i32,
        Syscall::Yield => {
            kernel.yield_now();
            0
        }
        Syscall::Getlev => kernel.getlev(),
        Syscall::SetPriority => {
            kernel.set_priority(args.int(0)?, args.int(1)?);
            0
        }
        Syscall::Monopolize => {
            kernel.monopolize(args.int(0)?);
            0
        }
        Syscall::ThreadCreate => {
            let thread = args.int(0)?.into();
            let start_routine = args.int(1)?.into();
            let arg = args.int(2)?.into();
            kernel.thread_create(thread, start_routine, arg)
        }
        Syscall::ThreadExit => {
            kernel.thread_exit(args.int(0)?.into());
            0
        }
        Syscall::ThreadJoin => {
            let thread = args.int(0)?;
            let retval = args.int(1)?.into();
            kernel.thread_join(thread, retval)
        }
    })
}

/// Sleep for `n` ticks. Returns -1 if the caller is killed while asleep.
///
/// A negative duration does not sleep.
fn sleep<K: Kernel + ?Sized>(kernel: &mut K, n: i32) -> i32 {
    let wanted = n.max(0) as u32;
    let start = kernel.ticks();
    while kernel.ticks().wrapping_sub(start) < wanted {
        if kernel.killed() {
            return -1;
        }
        kernel.wait_tick();
    }
    0
}
