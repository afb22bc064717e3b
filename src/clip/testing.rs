use crate::prelude::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine double that records every invocation instead of spawning ffmpeg.
#[derive(Debug)]
pub(crate) struct SharedMockFfmpeg(Mutex<MockFfmpeg>);

#[derive(Debug)]
pub(crate) struct MockFfmpeg {
    pub(crate) args_log: Vec<Vec<String>>,
    pub(crate) duration: Duration,
}

impl SharedMockFfmpeg {
    pub(crate) fn new(duration: Duration) -> Arc<Self> {
        Arc::new(Self(Mutex::new(MockFfmpeg {
            args_log: Default::default(),
            duration,
        })))
    }

    pub(crate) fn unwrap(self: Arc<Self>) -> MockFfmpeg {
        Arc::try_unwrap(self).unwrap().0.into_inner().unwrap()
    }
}

#[async_trait]
impl crate::ffmpeg::Ffmpeg for SharedMockFfmpeg {
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>> {
        // The last argument is the output path; produce an empty file there
        // so callers can stat the "encoded" result.
        if let Some(output) = args.last() {
            fs::write(output, b"").await?;
        }

        self.0.lock().unwrap().args_log.push(args);

        Ok(vec![])
    }

    async fn probe_duration(&self, _path: &Utf8Path) -> Result<Duration> {
        Ok(self.0.lock().unwrap().duration)
    }
}
