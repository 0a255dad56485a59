use crate::generation::{BookRefresher, QuizGenerator};
use crate::logger;
use crate::models::{GenerationOutcome, WorkerRequest, WorkerResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;

/// Spawns the background worker that runs generation and book refresh jobs.
///
/// Each request becomes its own task on the worker's runtime, so an abandoned
/// generation never blocks the next one. Every request gets exactly one
/// response. The thread exits when the request channel disconnects.
pub fn spawn_generation_worker(
    response_tx: Sender<WorkerResponse>,
    request_rx: Receiver<WorkerRequest>,
    generator: Arc<dyn QuizGenerator>,
    refresher: Arc<dyn BookRefresher>,
) -> io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("book-quiz::generation")
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("book-quiz::generation_worker".to_string())
        .spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let response_tx = response_tx.clone();
                match request {
                    WorkerRequest::Generate(request) => {
                        logger::log(&format!(
                            "Worker received generation request {} for '{}'",
                            request.request_id, request.title
                        ));
                        let generator = Arc::clone(&generator);
                        runtime.spawn(async move {
                            let result = generator.generate(&request.title).await;
                            if let Err(e) = &result {
                                logger::log(&format!(
                                    "Worker generation {} failed: {}",
                                    request.request_id, e
                                ));
                            }
                            let outcome = GenerationOutcome {
                                request_id: request.request_id,
                                result,
                            };
                            let _ = response_tx.send(WorkerResponse::Generated(outcome));
                        });
                    }
                    WorkerRequest::RefreshBooks(_) => {
                        logger::log("Worker received book refresh request");
                        let refresher = Arc::clone(&refresher);
                        runtime.spawn(async move {
                            let result = refresher.refresh().await;
                            let _ = response_tx.send(WorkerResponse::BooksRefreshed(result));
                        });
                    }
                }
            }
            logger::log("Worker channel disconnected, exiting");
            runtime.shutdown_background();
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;
    use crate::generation::MockGenerator;
    use crate::models::{BookTitle, GenerationRequest, QuizItem, RefreshRequest, RequestId};
    use async_trait::async_trait;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    struct FixedRefresher(Result<(), QuizError>);

    #[async_trait]
    impl BookRefresher for FixedRefresher {
        async fn refresh(&self) -> Result<(), QuizError> {
            self.0.clone()
        }
    }

    fn generate(id: u64, title: &str) -> WorkerRequest {
        WorkerRequest::Generate(GenerationRequest {
            request_id: RequestId(id),
            title: BookTitle::from(title),
        })
    }

    #[test]
    fn test_worker_tags_each_result() {
        let items = vec![QuizItem::new("A?", ["x", "y"], "y")];
        let generator = Arc::new(MockGenerator::with_results(
            vec![Ok(items.clone()), Err(QuizError::Generation("boom".into()))],
            Duration::from_millis(5),
        ));
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();
        let handle = spawn_generation_worker(
            response_tx,
            request_rx,
            generator.clone(),
            Arc::new(FixedRefresher(Ok(()))),
        )
        .unwrap();

        request_tx.send(generate(1, "Alpha")).unwrap();
        let first = response_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        request_tx.send(generate(2, "Beta")).unwrap();
        let second = response_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        match first {
            WorkerResponse::Generated(outcome) => {
                assert_eq!(outcome.request_id, RequestId(1));
                assert_eq!(outcome.result, Ok(items));
            }
            other => panic!("unexpected response {:?}", other),
        }
        match second {
            WorkerResponse::Generated(outcome) => {
                assert_eq!(outcome.request_id, RequestId(2));
                assert!(outcome.result.is_err());
            }
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(
            generator.calls(),
            vec![BookTitle::from("Alpha"), BookTitle::from("Beta")]
        );

        drop(request_tx);
        handle.join().unwrap();
        assert!(response_rx.try_recv().is_err());
    }

    #[test]
    fn test_worker_reports_refresh() {
        let generator = Arc::new(MockGenerator::with_results(Vec::new(), Duration::ZERO));
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();
        let handle = spawn_generation_worker(
            response_tx,
            request_rx,
            generator,
            Arc::new(FixedRefresher(Err(QuizError::Generation("exit 1".into())))),
        )
        .unwrap();

        request_tx
            .send(WorkerRequest::RefreshBooks(RefreshRequest))
            .unwrap();
        match response_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::BooksRefreshed(result) => assert!(result.is_err()),
            other => panic!("unexpected response {:?}", other),
        }

        drop(request_tx);
        handle.join().unwrap();
    }
}
