use std::sync::mpsc;

use crate::stats::GenerationStats;

/// Observer for long-running evolution. All hooks are optional no-ops by
/// default so implementors only override what they care about.
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, _generation: u32) {}
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}
    fn on_genome_evaluated(&mut self, _current: usize, _total: usize) {}
}

/// No-op callback for callers that do not want progress reporting.
pub struct NullProgressCallback;

impl ProgressCallback for NullProgressCallback {}

/// Logs progress through the `log` facade.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: u32) {
        log::debug!("Generation {} starting", generation + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::info!(
            "Generation {} complete: best {:.4}, average {:.4}, diversity {:.3}",
            stats.generation + 1,
            stats.best,
            stats.average,
            stats.diversity
        );
    }

    fn on_genome_evaluated(&mut self, current: usize, total: usize) {
        if current % 10 == 0 || current == total {
            log::debug!("Evaluated {current}/{total} genomes");
        }
    }
}

/// Messages forwarded by [`ChannelProgressCallback`], for driving a UI or
/// another thread.
#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart(u32),
    GenerationComplete(GenerationStats),
    GenomeEvaluated { current: usize, total: usize },
}

pub struct ChannelProgressCallback {
    sender: mpsc::Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: u32) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(*stats));
    }

    fn on_genome_evaluated(&mut self, current: usize, total: usize) {
        let _ = self
            .sender
            .send(ProgressMessage::GenomeEvaluated { current, total });
    }
}
