//! Background worker thread. Network calls run here so the UI never blocks.
//!
//! Communication with the main thread is via `mpsc` channels. Every request
//! carries an id; the app drops responses whose id it no longer waits for.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use ongil_core::analysis::{AnalysisRequest, AnalysisResponse};
use ongil_services::AnalysisService;
use tracing::{info, warn};

#[derive(Debug)]
pub enum WorkerCommand {
    Analyze { id: u64, request: AnalysisRequest },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerResponse {
    AnalysisDone {
        id: u64,
        report: Box<AnalysisResponse>,
        elapsed_ms: u128,
    },
    AnalysisFailed {
        id: u64,
        error: String,
    },
}

pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    service: Arc<dyn AnalysisService>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("ongil-worker".into())
        .spawn(move || worker_loop(rx, tx, service))
}

fn worker_loop(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    service: Arc<dyn AnalysisService>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(cmd, &tx, service.as_ref()),
        }
    }
    info!("worker stopped");
}

fn handle_command(cmd: WorkerCommand, tx: &Sender<WorkerResponse>, service: &dyn AnalysisService) {
    match cmd {
        WorkerCommand::Analyze { id, request } => {
            let started = Instant::now();
            let response = match service.analyze(&request) {
                Ok(report) => WorkerResponse::AnalysisDone {
                    id,
                    report: Box::new(report),
                    elapsed_ms: started.elapsed().as_millis(),
                },
                Err(e) => {
                    warn!(id, error = %e, "analysis failed");
                    WorkerResponse::AnalysisFailed {
                        id,
                        error: e.to_string(),
                    }
                }
            };
            // The receiver is gone only while the app is shutting down.
            let _ = tx.send(response);
        }
        WorkerCommand::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ongil_core::analysis::{MinMax, ScoreItem};
    use ongil_services::ApiError;
    use std::sync::mpsc;
    use std::time::Duration;

    struct Canned(Result<f64, u16>);

    impl AnalysisService for Canned {
        fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError> {
            match self.0 {
                Ok(score) => Ok(AnalysisResponse {
                    scores: vec![ScoreItem {
                        name: "location".into(),
                        score,
                        reason: None,
                        expected_price: None,
                    }],
                    ..Default::default()
                }),
                Err(code) => Err(ApiError::Status {
                    code,
                    body: "nope".into(),
                }),
            }
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            addr: "37.5665,126.978".into(),
            category: "한식".into(),
            marketing_area: "해당 사항 없음".into(),
            budget: MinMax::new(50, 100),
            management_method: "홀 영업 위주".into(),
            representative_menu_name: None,
            representative_menu_price: None,
            average_price: MinMax::new(8000, 12000),
            size: MinMax::new(11, 20),
            height: "1".into(),
        }
    }

    fn run(service: Canned) -> WorkerResponse {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, Arc::new(service)).unwrap();
        cmd_tx
            .send(WorkerCommand::Analyze {
                id: 7,
                request: request(),
            })
            .unwrap();
        let resp = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
        resp
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, Arc::new(Canned(Ok(1.0)))).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn success_echoes_request_id() {
        match run(Canned(Ok(88.0))) {
            WorkerResponse::AnalysisDone { id, report, .. } => {
                assert_eq!(id, 7);
                assert_eq!(report.overall_score(), Some(88.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failure_carries_display_text() {
        match run(Canned(Err(503))) {
            WorkerResponse::AnalysisFailed { id, error } => {
                assert_eq!(id, 7);
                assert!(error.contains("503"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
