//! stream-monitor demo pipeline
//!
//! Runs `source → filter → tumbling window → drain` on dedicated threads
//! connected by crossbeam channels. The filter and window stages each own a
//! sampler; after 30 seconds both emit their summary to the configured sink.
//!
//! Usage: `stream-monitor [config.toml] [run-seconds]`

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use stream_monitor::config::MonitorConfig;
use stream_monitor::pipeline::{FilterNode, MonitoredOperator, Operator, TumblingWindowNode};
use stream_monitor::{logging, OBSERVATION_WINDOW};

type Reading = (u64, f64);
type WindowMean = (usize, f64);

const CHANNEL_CAPACITY: usize = 1024;
const SOURCE_INTERVAL: Duration = Duration::from_millis(1);
const WINDOW_SIZE: usize = 8;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MonitorConfig::load(&path)
            .with_context(|| format!("loading monitor config from {}", path))?,
        None => MonitorConfig::default(),
    };
    let run_for = match args.next() {
        Some(secs) => Duration::from_secs(secs.parse().context("parsing run-seconds")?),
        None => OBSERVATION_WINDOW + Duration::from_secs(5),
    };

    let _guard = logging::init(&config.logging)?;
    tracing::info!(
        mode = %config.job.resolve_sink_mode()?,
        run_for_s = run_for.as_secs(),
        "Starting stream-monitor demo pipeline"
    );

    let running = Arc::new(AtomicBool::new(true));
    let (source_tx, source_rx) = bounded::<Reading>(CHANNEL_CAPACITY);
    let (filtered_tx, filtered_rx) = bounded::<Reading>(CHANNEL_CAPACITY);
    let (window_tx, window_rx) = bounded::<WindowMean>(CHANNEL_CAPACITY);

    let source = {
        let running = running.clone();
        thread::spawn(move || run_source(source_tx, running))
    };

    let filter = MonitoredOperator::new(
        FilterNode::new("positive", |r: &Reading| r.1 > 0.0),
        "filter-positive",
        config.job.clone(),
    );
    let filter = thread::spawn(move || run_stage(filter, source_rx, filtered_tx));

    let window = MonitoredOperator::new(
        TumblingWindowNode::new("mean8", WINDOW_SIZE, |w: &[Reading]| {
            (w.len(), w.iter().map(|r| r.1).sum::<f64>() / w.len() as f64)
        }),
        "window-mean8",
        config.job.clone(),
    );
    let window = thread::spawn(move || run_stage(window, filtered_rx, window_tx));

    let started = Instant::now();
    let mut drained = 0u64;
    while started.elapsed() < run_for {
        if window_rx.recv_timeout(Duration::from_millis(100)).is_ok() {
            drained += 1;
        }
    }
    running.store(false, Ordering::Relaxed);
    drop(window_rx);

    source.join().map_err(|_| anyhow::anyhow!("source thread panicked"))?;
    filter
        .join()
        .map_err(|_| anyhow::anyhow!("filter thread panicked"))?
        .context("filter stage")?;
    window
        .join()
        .map_err(|_| anyhow::anyhow!("window thread panicked"))?
        .context("window stage")?;

    tracing::info!(windows = drained, "Demo pipeline finished");
    Ok(())
}

fn run_source(tx: Sender<Reading>, running: Arc<AtomicBool>) {
    let mut seq = 0u64;
    while running.load(Ordering::Relaxed) {
        let value = (seq.wrapping_mul(7919) % 100) as f64 - 50.0;
        if tx.send((seq, value)).is_err() {
            break;
        }
        seq += 1;
        thread::sleep(SOURCE_INTERVAL);
    }
    tracing::debug!(produced = seq, "source stopped");
}

fn run_stage<O>(
    mut stage: MonitoredOperator<O>,
    rx: Receiver<O::In>,
    tx: Sender<O::Out>,
) -> Result<()>
where
    O: Operator,
{
    let mut out = Vec::new();
    for input in rx {
        stage.push(input, &mut out)?;
        for produced in out.drain(..) {
            if tx.send(produced).is_err() {
                return finish(&stage);
            }
        }
    }
    finish(&stage)
}

fn finish<O: Operator>(stage: &MonitoredOperator<O>) -> Result<()> {
    let sampler = stage.sampler();
    tracing::debug!(
        operator = stage.operator().name(),
        state = ?sampler.state(),
        inputs = sampler.input_count(),
        outputs = sampler.output_count(),
        "stage stopped"
    );
    Ok(())
}
