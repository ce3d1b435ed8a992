use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

type Out = Box<dyn Write + Send>;

/// Line-atomic writer for replies. Cloned into worker threads so a request
/// that finishes off the loop can still answer.
#[derive(Clone)]
pub struct ReplySink {
    out: Arc<Mutex<Out>>,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ReplySink {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Out) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            workers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn send(&self, value: &serde_json::Value) {
        let line = serde_json::to_string(value).unwrap_or_else(|_| "{\"ok\":false}".to_string());
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    /// Runs `work` on its own thread and sends whatever it returns.
    pub fn defer<F>(&self, name: &str, work: F) -> io::Result<()>
    where
        F: FnOnce() -> serde_json::Value + Send + 'static,
    {
        let sink = self.clone();
        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || sink.send(&work()))?;
        let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
        workers.retain(|h| !h.is_finished());
        workers.push(handle);
        Ok(())
    }

    /// Waits for every deferred reply to be written.
    pub fn drain(&self) {
        let pending: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
            workers.drain(..).collect()
        };
        for handle in pending {
            if handle.join().is_err() {
                log::error!("reply worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn deferred_replies_are_whole_lines() {
        let captured = Captured::default();
        let sink = ReplySink::new(Box::new(captured.clone()));
        for i in 0..8 {
            sink.defer("test-worker", move || serde_json::json!({ "id": i.to_string(), "ok": true }))
                .unwrap();
        }
        sink.send(&serde_json::json!({ "id": "inline", "ok": true }));
        sink.drain();

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 9);
    }
}
