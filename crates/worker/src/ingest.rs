//! The long-running inbound-message ingestion loop.
//!
//! Polls the messaging provider, dispatches each update through the
//! conversational state machine, and replies through the gateway. The loop
//! checks its stop flag at every suspension point; in-flight calls run to
//! completion, never interrupted.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{oneshot, watch};
use tracing::{error, info, warn};

use conversation::{ConversationStateMachine, UploadOutcome};
use resume_core::error::{Error, Result};
use resume_core::limits::MAX_UPLOAD_SIZE_BYTES;
use resume_core::InterviewType;

use crate::gateway::{InboundUpdate, MessageGateway};
use crate::lifecycle::{Phase, PhaseCell};

/// Consecutive poll failures tolerated before the worker gives up.
pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 5;

const WELCOME: &str = "Welcome to the resume analyzer.\n\
Send a resume file (PDF, DOCX, or TXT; images are accepted but not yet readable) and I will extract and analyze it.\n\n\
Commands:\n\
/help - usage instructions\n\
/chat - ask questions about the analyzed resume\n\
/interview <general|technical|behavioral|leadership> - interview preparation\n\
/export - download the extracted data as JSON\n\
/stop - leave chat mode";

const HELP: &str = "1. Upload a resume file (20 MB max).\n\
2. Wait for extraction and analysis.\n\
3. Use /chat to ask questions about it, or /interview <type> for a preparation guide.\n\
Files are processed in memory and never stored.";

const UPLOAD_HINT: &str = "Send a resume file (PDF, DOCX, or TXT) to analyze.\n\
If you already analyzed one, use /chat to ask questions about it.";

const CHAT_ENABLED: &str = "Chat mode enabled. Ask me anything about the analyzed resume. Use /stop to leave.";

const CHAT_DISABLED: &str = "Chat mode disabled. Upload a new resume or use /chat to re-enable.";

const INTERVIEW_USAGE: &str =
    "Choose an interview type: /interview general | technical | behavioral | leadership";

/// Single background execution unit polling the provider.
pub struct IngestWorker {
    gateway: Arc<dyn MessageGateway>,
    machine: Arc<ConversationStateMachine>,
    phase: Arc<PhaseCell>,
    stop_rx: watch::Receiver<bool>,
    poll_backoff: Duration,
}

impl IngestWorker {
    pub fn new(
        gateway: Arc<dyn MessageGateway>,
        machine: Arc<ConversationStateMachine>,
        phase: Arc<PhaseCell>,
        stop_rx: watch::Receiver<bool>,
        poll_backoff: Duration,
    ) -> Self {
        Self {
            gateway,
            machine,
            phase,
            stop_rx,
            poll_backoff,
        }
    }

    /// Runs until stopped or crashed. Fulfills `ready_tx` once the provider
    /// connection is verified, and `done_tx` on exit.
    pub async fn run(
        self,
        ready_tx: oneshot::Sender<std::result::Result<(), String>>,
        done_tx: oneshot::Sender<()>,
    ) {
        if let Err(e) = self.gateway.check_connection().await {
            error!(error = %e, "provider connection check failed");
            let _ = ready_tx.send(Err(e.to_string()));
            let _ = done_tx.send(());
            return;
        }
        let _ = ready_tx.send(Ok(()));
        info!("ingestion worker ready");

        let mut stop_rx = self.stop_rx.clone();
        let mut offset = 0i64;
        let mut failures = 0u32;
        let mut crashed = false;

        loop {
            if *stop_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = stop_rx.changed() => break,
                polled = self.gateway.poll_updates(offset) => match polled {
                    Ok((updates, next_offset)) => {
                        failures = 0;
                        offset = next_offset;
                        for update in updates {
                            self.dispatch(update).await;
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        error!(error = %e, failures = failures, "provider poll failed");
                        if failures >= MAX_CONSECUTIVE_POLL_FAILURES {
                            self.phase.set(Phase::Crashed);
                            crashed = true;
                            break;
                        }
                        tokio::time::sleep(self.poll_backoff).await;
                    }
                }
            }
        }

        if !crashed {
            self.phase.set(Phase::Stopped);
        }
        info!(crashed = crashed, "ingestion worker exited");
        let _ = done_tx.send(());
    }

    async fn dispatch(&self, update: InboundUpdate) {
        let chat_id = update.chat_id();
        let result = match update {
            InboundUpdate::Document {
                chat_id,
                file_id,
                file_name,
                file_size,
            } => {
                self.handle_document(chat_id, &file_id, &file_name, file_size)
                    .await
            }
            InboundUpdate::Text { chat_id, text } => self.handle_text(chat_id, &text).await,
            InboundUpdate::Callback { chat_id, data } => self.handle_callback(chat_id, &data).await,
        };

        if let Err(e) = result {
            warn!(chat_id = chat_id, error = %e, "update handling failed");
            let reply = format!("Sorry, that did not work: {e}");
            if let Err(send_err) = self.gateway.send_text(chat_id, &reply).await {
                warn!(chat_id = chat_id, error = %send_err, "failed to send error reply");
            }
        }
    }

    async fn handle_document(
        &self,
        chat_id: i64,
        file_id: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<()> {
        // Size gate before download; the machine re-checks the actual bytes.
        if file_size as usize > MAX_UPLOAD_SIZE_BYTES {
            return Err(Error::invalid_file(format!(
                "file is {file_size} bytes, limit is {MAX_UPLOAD_SIZE_BYTES} bytes"
            )));
        }

        self.gateway
            .send_text(chat_id, "Processing your resume, this may take a moment.")
            .await?;

        let bytes = self.gateway.download_document(file_id).await?;
        let session_id = chat_id.to_string();

        match self
            .machine
            .handle_upload(&session_id, file_name, bytes)
            .await?
        {
            UploadOutcome::Analyzed { formatted, .. } => {
                self.gateway.send_text(chat_id, &formatted).await?;
                self.gateway
                    .send_text(
                        chat_id,
                        "Analysis complete. Use /chat to ask questions, \
                         /interview <type> for preparation, or /export for the raw JSON.",
                    )
                    .await
            }
            UploadOutcome::ImageNotSupported { message } => {
                self.gateway.send_text(chat_id, &message).await
            }
        }
    }

    async fn handle_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let session_id = chat_id.to_string();
        let trimmed = text.trim();

        let Some(command_line) = trimmed.strip_prefix('/') else {
            // Free text: a chat turn when chat mode is active, a hint
            // otherwise.
            return match self.machine.handle_chat_message(&session_id, trimmed).await {
                Ok(reply) => self.gateway.send_text(chat_id, &reply.answer).await,
                Err(Error::NoActiveAnalysis(_)) => {
                    self.gateway.send_text(chat_id, UPLOAD_HINT).await
                }
                Err(e) => Err(e),
            };
        };

        let mut parts = command_line.split_whitespace();
        match parts.next().unwrap_or("") {
            "start" => {
                self.machine.reset_session(&session_id).await;
                self.gateway.send_text(chat_id, WELCOME).await
            }
            "help" => self.gateway.send_text(chat_id, HELP).await,
            "chat" => {
                self.machine.enter_chat(&session_id).await?;
                self.gateway.send_text(chat_id, CHAT_ENABLED).await
            }
            "stop" => {
                // Leaving chat without a session is not worth an error.
                let _ = self.machine.exit_chat(&session_id).await;
                self.gateway.send_text(chat_id, CHAT_DISABLED).await
            }
            "interview" => match parts.next() {
                Some(raw_type) => {
                    let interview_type: InterviewType = raw_type.parse()?;
                    self.run_interview_prep(chat_id, &session_id, interview_type)
                        .await
                }
                None => self.gateway.send_text(chat_id, INTERVIEW_USAGE).await,
            },
            "export" => {
                let (data, _) = self.machine.resume_export(&session_id).await?;
                let json = serde_json::to_vec_pretty(&data)?;
                self.gateway
                    .send_document(chat_id, "resume_data.json", Bytes::from(json))
                    .await
            }
            other => {
                self.gateway
                    .send_text(chat_id, &format!("Unknown command /{other}. Try /help."))
                    .await
            }
        }
    }

    async fn handle_callback(&self, chat_id: i64, data: &str) -> Result<()> {
        let session_id = chat_id.to_string();

        if data == "chat" {
            self.machine.enter_chat(&session_id).await?;
            return self.gateway.send_text(chat_id, CHAT_ENABLED).await;
        }
        if data == "exit_chat" {
            let _ = self.machine.exit_chat(&session_id).await;
            return self.gateway.send_text(chat_id, CHAT_DISABLED).await;
        }
        if let Some(raw_type) = data.strip_prefix("interview:") {
            let interview_type: InterviewType = raw_type.parse()?;
            return self
                .run_interview_prep(chat_id, &session_id, interview_type)
                .await;
        }
        if let Some(token) = data.strip_prefix("export:") {
            let guide = self.machine.export_guide(token).await?;
            let json = serde_json::to_vec_pretty(&guide)?;
            return self
                .gateway
                .send_document(chat_id, "interview_preparation_guide.json", Bytes::from(json))
                .await;
        }

        warn!(chat_id = chat_id, data = %data, "unrecognized callback");
        Ok(())
    }

    /// Generates a guide, sends the rendering, then consumes the one-shot
    /// export token to deliver the detailed JSON.
    async fn run_interview_prep(
        &self,
        chat_id: i64,
        session_id: &str,
        interview_type: InterviewType,
    ) -> Result<()> {
        self.gateway
            .send_text(chat_id, "Generating your interview preparation guide.")
            .await?;

        let reply = self
            .machine
            .handle_interview_prep(session_id, interview_type)
            .await?;
        self.gateway.send_text(chat_id, &reply.formatted).await?;

        let guide = self.machine.export_guide(&reply.export_token).await?;
        let json = serde_json::to_vec_pretty(&guide)?;
        self.gateway
            .send_document(chat_id, "interview_preparation_guide.json", Bytes::from(json))
            .await
    }
}
