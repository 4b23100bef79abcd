//! `hhstat run`: load configuration and events, run the selection, write results.

use anyhow::{Context, Result};
use hh_hist::HistogramBook;
use hh_select::catalogue::book_histograms;
use hh_select::{AnalysisConfig, Analyzer, DetailRecord, Event, EventOutcome};
use rayon::prelude::*;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read the selection configuration. `.json` is parsed as JSON, anything
/// else as YAML.
pub fn read_analysis_config(path: &Path) -> Result<AnalysisConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: AnalysisConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Read one JSON event per line; blank lines are skipped.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening events {}", path.display()))?;
    let mut events = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let ev = Event::from_json(&line).with_context(|| format!("{}:{}: invalid event", path.display(), lineno + 1))?;
        events.push(ev);
    }
    Ok(events)
}

/// Merged result of a run.
#[derive(Debug)]
pub struct RunTotals {
    /// Merged histograms.
    pub book: HistogramBook,
    /// Events read from the input.
    pub events_read: u64,
    /// Events past the vertex gate.
    pub events_processed: u64,
    /// Events stopped by the vertex gate.
    pub events_aborted: u64,
    /// Detail rows in event order.
    pub records: Vec<DetailRecord>,
}

impl RunTotals {
    fn empty(book: HistogramBook) -> Self {
        Self { book, events_read: 0, events_processed: 0, events_aborted: 0, records: Vec::new() }
    }

    fn from_worker((analyzer, records): (Analyzer<HistogramBook>, Vec<DetailRecord>)) -> Self {
        Self {
            events_read: analyzer.events_seen(),
            events_processed: analyzer.events_processed(),
            events_aborted: analyzer.events_aborted(),
            book: analyzer.into_sink(),
            records,
        }
    }

    fn merge(mut self, other: RunTotals) -> hh_core::Result<Self> {
        self.book.merge(&other.book)?;
        self.events_read += other.events_read;
        self.events_processed += other.events_processed;
        self.events_aborted += other.events_aborted;
        self.records.extend(other.records);
        Ok(self)
    }

    /// Summary JSON written to `--output`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "events_read": self.events_read,
            "events_processed": self.events_processed,
            "events_aborted": self.events_aborted,
            "histograms": self.book.histograms().collect::<Vec<_>>(),
            "profiles": self.book.profiles().collect::<Vec<_>>(),
            "undeclared": self.book.undeclared(),
        })
    }
}

/// Process `events` with `threads` workers (0 = auto), each filling a
/// private book; books are merged bin-wise at the end.
pub fn process_events(config: AnalysisConfig, events: &[Event], threads: usize) -> Result<RunTotals> {
    let template = book_histograms()?;
    let proto = Analyzer::new(config, template.empty_like())?;
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    tracing::info!(events = events.len(), threads = pool.current_num_threads(), "processing events");

    let totals = pool.install(|| {
        events
            .par_iter()
            .enumerate()
            .try_fold(
                || (proto.fork(template.empty_like()), Vec::new()),
                |(mut analyzer, mut records), (i, ev)| {
                    if let EventOutcome::Processed(summary) = analyzer.process_indexed(i as u64, ev)? {
                        records.extend(summary.records);
                    }
                    Ok::<_, hh_core::Error>((analyzer, records))
                },
            )
            .map(|worker| worker.map(RunTotals::from_worker))
            .try_reduce(|| RunTotals::empty(template.empty_like()), RunTotals::merge)
    })?;
    tracing::info!(
        processed = totals.events_processed,
        aborted = totals.events_aborted,
        "selection complete"
    );
    Ok(totals)
}

/// Write detail rows as JSON lines.
pub fn write_records(path: &Path, records: &[DetailRecord]) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for r in records {
        serde_json::to_writer(&mut w, r)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

/// `hhstat run`. Returns the summary JSON; detail rows go to `records_path`.
pub fn cmd_run(
    events_path: &Path,
    config_path: Option<&Path>,
    records_path: Option<&Path>,
    threads: usize,
) -> Result<serde_json::Value> {
    let mut config = match config_path {
        Some(p) => read_analysis_config(p)?,
        None => AnalysisConfig::default(),
    };
    if records_path.is_some() {
        config.emit_detail_records = true;
    }
    tracing::info!(path = %events_path.display(), "reading events");
    let events = read_events(events_path)?;

    let totals = process_events(config, &events, threads)?;
    if let Some(path) = records_path {
        write_records(path, &totals.records)?;
        tracing::info!(rows = totals.records.len(), path = %path.display(), "detail records written");
    } else if !totals.records.is_empty() {
        tracing::warn!(rows = totals.records.len(), "detail records enabled but no --records path given");
    }
    Ok(totals.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hh_select::event::{Photon, PtEtaPhiM, SuperCluster, Vertex};

    fn event(ndof: f64, photon_pt: f64) -> Event {
        let mut ev = Event::empty();
        ev.vertices = vec![Vertex { is_fake: false, ndof }];
        ev.photons = vec![Photon {
            p4: PtEtaPhiM::massless(photon_pt, 0.5, 0.0),
            super_cluster: SuperCluster { energy: photon_pt * 0.5f64.cosh(), eta: 0.5, phi: 0.0 },
            r9: 0.9,
            hadronic_over_em: 0.0,
            sigma_ieta_ieta: 0.0,
            charged_hadron_iso: 0.0,
            neutral_hadron_iso: 0.0,
            photon_iso: 0.0,
            puppi_charged_hadron_iso: 0.0,
            puppi_neutral_hadron_iso: 0.0,
            puppi_photon_iso: 0.0,
        }];
        ev
    }

    #[test]
    fn thread_count_does_not_change_counts() {
        let events: Vec<Event> = (0..40).map(|i| event(if i % 5 == 0 { 2.0 } else { 10.0 }, 5.0 + i as f64)).collect();
        let one = process_events(AnalysisConfig::default(), &events, 1).unwrap();
        let four = process_events(AnalysisConfig::default(), &events, 4).unwrap();
        assert_eq!(one.events_read, 40);
        assert_eq!(one.events_aborted, 8);
        assert_eq!(four.events_processed, one.events_processed);
        for (a, b) in one.book.histograms().zip(four.book.histograms()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.bin_content, b.bin_content, "{}", a.name);
        }
    }

    #[test]
    fn records_keep_event_order() {
        let events: Vec<Event> = (0..12).map(|i| event(10.0, 20.0 + i as f64)).collect();
        let cfg = AnalysisConfig::default().emit_detail_records(true);
        let totals = process_events(cfg, &events, 3).unwrap();
        let order: Vec<u64> = totals
            .records
            .iter()
            .filter_map(|r| match r {
                DetailRecord::EventTruth(t) => Some(t.event),
                DetailRecord::Photon(_) => None,
            })
            .collect();
        assert_eq!(order, (0..12).collect::<Vec<u64>>());
    }
}
