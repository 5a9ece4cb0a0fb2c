use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::SessionPhase;

const REMAINING_MASK: u64 = 0xFFFF_FFFF;
const ARMED_BIT: u64 = 1 << 32;
const GENERATION_SHIFT: u32 = 33;
const GENERATION_MASK: u32 = 0x7FFF_FFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Word {
    generation: u32,
    armed: bool,
    remaining: u32,
}

impl Word {
    fn unpack(raw: u64) -> Self {
        Self {
            generation: (raw >> GENERATION_SHIFT) as u32 & GENERATION_MASK,
            armed: raw & ARMED_BIT != 0,
            remaining: (raw & REMAINING_MASK) as u32,
        }
    }

    fn pack(self) -> u64 {
        (u64::from(self.generation & GENERATION_MASK) << GENERATION_SHIFT)
            | if self.armed { ARMED_BIT } else { 0 }
            | u64::from(self.remaining)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownTick {
    Running { remaining: u32 },
    Expired,
    /// The countdown was cancelled or re-armed since this ticker was issued.
    Cancelled,
}

/// Seconds left in one phase, shared between the engine and the task that
/// ticks it. The whole state lives in one atomic word, so readers never see a
/// half-updated countdown. Every `arm` and `cancel` bumps the generation;
/// tickers of an older generation stop decrementing immediately.
#[derive(Debug)]
pub struct Countdown {
    phase: SessionPhase,
    shared: Arc<AtomicU64>,
}

impl Countdown {
    pub fn new(phase: SessionPhase) -> Self {
        Self {
            phase,
            shared: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn arm(&mut self, seconds: u32) -> CountdownTicker {
        let generation = self.bump(true, Some(seconds));
        CountdownTicker {
            phase: self.phase,
            generation,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Returns whether the countdown was still running.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.bump(false, None);
        was_armed
    }

    pub fn remaining(&self) -> u32 {
        self.load().remaining
    }

    pub fn is_armed(&self) -> bool {
        self.load().armed
    }

    pub fn generation(&self) -> u32 {
        self.load().generation
    }

    /// A fresh handle onto the running countdown, if any.
    pub fn ticker(&self) -> Option<CountdownTicker> {
        let word = self.load();
        word.armed.then(|| CountdownTicker {
            phase: self.phase,
            generation: word.generation,
            shared: Arc::clone(&self.shared),
        })
    }

    fn load(&self) -> Word {
        Word::unpack(self.shared.load(Ordering::Acquire))
    }

    fn bump(&mut self, armed: bool, remaining: Option<u32>) -> u32 {
        let mut current = self.shared.load(Ordering::Acquire);
        loop {
            let word = Word::unpack(current);
            let next = Word {
                generation: word.generation.wrapping_add(1) & GENERATION_MASK,
                armed,
                remaining: remaining.unwrap_or(word.remaining),
            };
            match self.shared.compare_exchange_weak(
                current,
                next.pack(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next.generation,
                Err(actual) => current = actual,
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct CountdownTicker {
    phase: SessionPhase,
    generation: u32,
    shared: Arc<AtomicU64>,
}

impl CountdownTicker {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Takes one second off the countdown.
    pub fn tick(&self) -> CountdownTick {
        let mut current = self.shared.load(Ordering::Acquire);
        loop {
            let word = Word::unpack(current);
            if word.generation != self.generation || !word.armed {
                return CountdownTick::Cancelled;
            }
            let remaining = word.remaining.saturating_sub(1);
            let next = Word {
                armed: remaining > 0,
                remaining,
                ..word
            };
            match self.shared.compare_exchange_weak(
                current,
                next.pack(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) if remaining == 0 => return CountdownTick::Expired,
                Ok(_) => return CountdownTick::Running { remaining },
                Err(actual) => current = actual,
            }
        }
    }
}
