//! Operation arena and recording scopes.
//!
//! A [`Tape`] stores one node per elementary operation performed on active
//! scalars. Each node keeps the local partial derivatives with respect to its
//! operands, so the reverse sweep is a single backwards pass over the arena.
//!
//! Recordings are path-scoped: [`Tape::begin_recording`] clears the arena and
//! returns a [`Recording`] guard. Dropping the guard ends the scope, on every
//! exit path including early `?` returns.

use std::cell::{Cell, RefCell};
use std::ptr;

use crate::active::{Active, Slot};
use crate::error::TapeError;

/// Node capacity reserved by [`Tape::new`].
pub const DEFAULT_CAPACITY: usize = 16_384;

/// Local derivative record for one operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Op {
    /// Independent variable created by [`Recording::wrap`].
    Input,
    /// Result depending on one active operand.
    Unary { arg: usize, darg: f64 },
    /// Result depending on two active operands.
    Binary {
        lhs: usize,
        rhs: usize,
        dlhs: f64,
        drhs: f64,
    },
}

/// Reverse-mode tape.
///
/// Uses interior mutability so that arithmetic on [`Active`] values, which
/// only hold a shared reference, can append nodes. A tape is therefore not
/// `Sync`; parallel callers need one tape per worker.
///
/// # Examples
///
/// ```
/// use pricer_tape::Tape;
///
/// let tape = Tape::new();
/// {
///     let rec = tape.begin_recording().unwrap();
///     let x = rec.wrap(3.0);
///     let y = x * x;
///     rec.seed_gradient(y, 1.0);
///     rec.propagate_adjoints();
///     assert_eq!(rec.read_gradient(x), 6.0);
/// }
/// // The scope has ended; a new one can begin.
/// assert!(tape.begin_recording().is_ok());
/// ```
#[derive(Debug)]
pub struct Tape {
    ops: RefCell<Vec<Op>>,
    adjoints: RefCell<Vec<f64>>,
    epoch: Cell<u64>,
    recording: Cell<bool>,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Creates a tape with [`DEFAULT_CAPACITY`] nodes reserved.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a tape with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: RefCell::new(Vec::with_capacity(capacity)),
            adjoints: RefCell::new(Vec::with_capacity(capacity)),
            epoch: Cell::new(0),
            recording: Cell::new(false),
        }
    }

    /// Opens a new recording scope.
    ///
    /// Discards every node of the previous scope and invalidates all active
    /// scalars created in it.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::RecordingInProgress`] if a [`Recording`] from
    /// this tape is still alive.
    pub fn begin_recording(&self) -> Result<Recording<'_>, TapeError> {
        if self.recording.get() {
            return Err(TapeError::RecordingInProgress);
        }

        self.ops.borrow_mut().clear();
        self.adjoints.borrow_mut().clear();
        let epoch = self.epoch.get().wrapping_add(1);
        self.epoch.set(epoch);
        self.recording.set(true);

        Ok(Recording { tape: self, epoch })
    }

    /// Returns true while a recording scope is open.
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording.get()
    }

    /// Number of nodes recorded in the current (or last) scope.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    /// Returns true if no node has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    fn end_recording(&self) {
        self.recording.set(false);
        self.ops.borrow_mut().clear();
        self.adjoints.borrow_mut().clear();
    }

    /// Panics unless `slot` belongs to this tape's open scope.
    #[inline]
    fn check(&self, slot: &Slot<'_>) {
        assert!(
            ptr::eq(self, slot.tape),
            "active scalar belongs to a different tape"
        );
        assert!(
            self.recording.get() && slot.epoch == self.epoch.get(),
            "active scalar used outside the recording that created it"
        );
    }

    fn push(&self, op: Op, value: f64) -> Active<'_> {
        let mut ops = self.ops.borrow_mut();
        let index = ops.len();
        ops.push(op);
        Active::recorded(
            value,
            Slot {
                tape: self,
                index,
                epoch: self.epoch.get(),
            },
        )
    }

    pub(crate) fn push_unary<'t>(&'t self, arg: Slot<'t>, darg: f64, value: f64) -> Active<'t> {
        self.check(&arg);
        self.push(
            Op::Unary {
                arg: arg.index,
                darg,
            },
            value,
        )
    }

    pub(crate) fn push_binary<'t>(
        &'t self,
        lhs: Slot<'t>,
        rhs: Slot<'t>,
        dlhs: f64,
        drhs: f64,
        value: f64,
    ) -> Active<'t> {
        self.check(&lhs);
        self.check(&rhs);
        self.push(
            Op::Binary {
                lhs: lhs.index,
                rhs: rhs.index,
                dlhs,
                drhs,
            },
            value,
        )
    }
}

/// An open recording scope on a [`Tape`].
///
/// All differentiation calls go through this guard: wrapping inputs,
/// seeding the output, running the reverse sweep and reading gradients.
/// At most one recording per tape exists at a time.
#[derive(Debug)]
pub struct Recording<'t> {
    tape: &'t Tape,
    epoch: u64,
}

impl<'t> Recording<'t> {
    /// Registers `value` as an independent input.
    pub fn wrap(&self, value: f64) -> Active<'t> {
        self.tape.push(Op::Input, value)
    }

    /// Wraps every element of `values`, preserving order.
    pub fn wrap_slice(&self, values: &[f64]) -> Vec<Active<'t>> {
        values.iter().map(|&v| self.wrap(v)).collect()
    }

    /// Adds `gradient` to the adjoint of `output`.
    ///
    /// Seeding a passive constant is a no-op: nothing recorded depends on it.
    ///
    /// # Panics
    ///
    /// Panics if `output` was recorded in a different scope.
    pub fn seed_gradient(&self, output: Active<'t>, gradient: f64) {
        if let Some(slot) = output.slot() {
            self.tape.check(&slot);
            let mut adjoints = self.tape.adjoints.borrow_mut();
            adjoints.resize(self.tape.ops.borrow().len(), 0.0);
            adjoints[slot.index] += gradient;
        }
    }

    /// Runs the reverse sweep, accumulating adjoints from outputs to inputs.
    ///
    /// Adjoints accumulate: call [`Recording::clear_gradients`] before
    /// seeding a second output in the same scope.
    pub fn propagate_adjoints(&self) {
        let ops = self.tape.ops.borrow();
        let mut adjoints = self.tape.adjoints.borrow_mut();
        adjoints.resize(ops.len(), 0.0);

        for (i, op) in ops.iter().enumerate().rev() {
            let adjoint = adjoints[i];
            if adjoint == 0.0 {
                continue;
            }
            match *op {
                Op::Input => {}
                Op::Unary { arg, darg } => adjoints[arg] += darg * adjoint,
                Op::Binary {
                    lhs,
                    rhs,
                    dlhs,
                    drhs,
                } => {
                    adjoints[lhs] += dlhs * adjoint;
                    adjoints[rhs] += drhs * adjoint;
                }
            }
        }
    }

    /// Returns the accumulated adjoint of `input`; zero for passive constants.
    ///
    /// # Panics
    ///
    /// Panics if `input` was recorded in a different scope.
    pub fn read_gradient(&self, input: Active<'t>) -> f64 {
        match input.slot() {
            Some(slot) => {
                self.tape.check(&slot);
                self.tape
                    .adjoints
                    .borrow()
                    .get(slot.index)
                    .copied()
                    .unwrap_or(0.0)
            }
            None => 0.0,
        }
    }

    /// Zeroes every adjoint while keeping the recorded operations.
    pub fn clear_gradients(&self) {
        self.tape.adjoints.borrow_mut().iter_mut().for_each(|a| *a = 0.0);
    }

    /// Number of nodes recorded so far in this scope.
    #[inline]
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    /// Returns true if nothing has been recorded in this scope.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Identifier of this scope, unique per tape.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for Recording<'_> {
    fn drop(&mut self) {
        self.tape.end_recording();
    }
}
