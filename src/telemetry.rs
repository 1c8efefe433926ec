//! Decimated longitudinal plot telemetry.
//!
//! The recorder keeps one sample out of every [`DECIMATION`] control ticks
//! and hands out a full [`PlotBatch`] every [`BATCH_LEN`] samples. At the
//! nominal 100 Hz that is 5 samples per second and one batch every 2 s.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fsm::LongControlState;

pub const DECIMATION: u32 = 20;
pub const BATCH_LEN: usize = 10;

/// One plotted tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSample {
    pub gas: f32,
    pub brake: f32,
    /// Ego speed as seen by the PI loop (floored at the bus minimum).
    pub v_ego: f32,
    pub v_pid: f32,
    pub a_target: f32,
    pub state: LongControlState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotBatch(pub Vec<PlotSample, BATCH_LEN>);

impl PlotBatch {
    pub fn samples(&self) -> &[PlotSample] {
        &self.0
    }

    /// Serialise with postcard.
    pub fn encode(&self) -> Result<std::vec::Vec<u8>> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Serialise into a caller buffer; returns the used prefix.
    pub fn encode_into<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8]> {
        Ok(postcard::to_slice(self, buf)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

pub struct PlotRecorder {
    tick: u32,
    pending: PlotBatch,
}

impl Default for PlotRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotRecorder {
    pub fn new() -> Self {
        Self {
            tick: 0,
            pending: PlotBatch::default(),
        }
    }

    /// Offer this tick's sample. Returns a batch once it is full.
    pub fn record(&mut self, sample: PlotSample) -> Option<PlotBatch> {
        let keep = self.tick == 0;
        self.tick = (self.tick + 1) % DECIMATION;
        if !keep {
            return None;
        }

        // Capacity is only reached right before the batch is handed out.
        let _ = self.pending.0.push(sample);
        if self.pending.0.is_full() {
            Some(core::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    pub fn buffered(&self) -> usize {
        self.pending.0.len()
    }

    pub fn clear(&mut self) {
        self.tick = 0;
        self.pending.0.clear();
    }
}
