use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use console::style;
use meeting_bot_core::{
    ApiConfig, Attachment, CreateView, DeleteOutcome, DeletePolicy, HistoryView, HttpMeetingApi,
    LoadOutcome, LocalStore, MeetingApi, MeetingDraft, MeetingType, NavigationBridge, Route,
    SubmitOutcome, format_record_row, format_report_readable,
};
use tokio::fs;
use tracing::{debug, warn};

use crate::{
    create_spinner,
    notifier::{ConsoleNotifier, confirm},
};

pub struct App {
    api: Arc<HttpMeetingApi>,
    bridge: Arc<NavigationBridge>,
    notifier: Arc<ConsoleNotifier>,
}

impl App {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            api: Arc::new(HttpMeetingApi::new(config)),
            bridge: Arc::new(NavigationBridge::persistent(LocalStore::open_default())),
            notifier: Arc::new(ConsoleNotifier),
        }
    }

    fn history_view(&self, policy: DeletePolicy) -> HistoryView {
        HistoryView::new(
            self.api.clone(),
            self.bridge.clone(),
            self.notifier.clone(),
        )
        .with_delete_policy(policy)
    }

    fn header(&self, title: &str) {
        println!(
            "\n{}  {}\n",
            style("meeting-bot").cyan().bold(),
            style(title).dim()
        );
    }

    pub async fn create(
        &self,
        title: String,
        meeting_type: MeetingType,
        transcript: Option<String>,
        transcript_file: Option<PathBuf>,
        file: Option<PathBuf>,
    ) -> Result<()> {
        let transcript = match transcript_file {
            Some(path) => Some(
                fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading transcript {}", path.display()))?,
            ),
            None => transcript,
        };

        let mut draft = MeetingDraft::new(title, meeting_type);
        if let Some(transcript) = transcript {
            draft = draft.with_transcript(transcript);
        }
        if let Some(path) = file {
            let attachment = Attachment::from_path(&path)
                .await
                .with_context(|| format!("reading recording {}", path.display()))?;
            draft = draft.with_file(attachment);
        }
        if !draft.has_content() {
            warn!("no transcript or recording supplied; the server will summarize a placeholder");
        }

        self.header("Create meeting");
        let view = CreateView::new(self.api.clone(), self.bridge.clone(), self.notifier.clone());

        let spinner = create_spinner("Processing...");
        let outcome = view.submit(draft).await;
        spinner.finish_and_clear();

        match outcome? {
            SubmitOutcome::Submitted { id, route } => {
                if let Some(id) = id {
                    println!(
                        "{} Saved as {}",
                        style("✓").green().bold(),
                        style(format!("#{}", id)).cyan()
                    );
                }
                self.navigate(route).await
            }
            SubmitOutcome::AlreadySubmitting => Ok(()),
        }
    }

    pub async fn history(&self, search: &str, filter_type: &str) -> Result<()> {
        self.header("Meeting History");
        let view = self.history_view(DeletePolicy::default());
        view.set_search_term(search);
        view.set_filter_type(filter_type);

        let spinner = create_spinner("Loading history...");
        view.load().await;
        spinner.finish_and_clear();

        let visible = view.visible_records();
        if visible.is_empty() {
            println!("{}", style("No meetings found.").dim());
            if view.is_empty_history() {
                println!(
                    "Get started by creating one: {}",
                    style("meeting-bot create --title <TITLE> --transcript <TEXT>").cyan()
                );
            }
            return Ok(());
        }

        for record in &visible {
            println!("{}", format_record_row(record));
        }
        println!(
            "\n{} {}",
            style(format!("{} of {}", visible.len(), view.records().len())).dim(),
            style("meetings").dim()
        );
        Ok(())
    }

    pub async fn view(&self, id: i64) -> Result<()> {
        let view = self.history_view(DeletePolicy::default());

        let spinner = create_spinner("Loading history...");
        view.load().await;
        spinner.finish_and_clear();

        let Some(record) = view.find(id) else {
            bail!("meeting #{} not found", id);
        };
        let route = view.view(&record).await?;

        self.header(&record.title);
        self.navigate(route).await
    }

    pub async fn show(&self, id: i64) -> Result<()> {
        let spinner = create_spinner("Fetching meeting...");
        let record = self.api.get_meeting(id).await;
        spinner.finish_and_clear();
        let record = record?;

        self.header("Meeting");
        println!("{}", format_record_row(&record));
        if let Some(created_at) = &record.created_at {
            println!("{} {}", style("Created:").dim(), created_at);
        }
        if let Some(file_path) = &record.file_path {
            println!("{} {}", style("Recording:").dim(), file_path);
        }
        if let Some(transcript) = &record.transcript {
            println!("\n{}\n\n{}", style("Transcript").bold(), transcript.trim());
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64, yes: bool, strict: bool) -> Result<()> {
        if !yes && !confirm("Are you sure you want to delete this meeting?")? {
            return Ok(());
        }

        let policy = if strict {
            DeletePolicy::ConfirmStatus
        } else {
            DeletePolicy::Optimistic
        };
        let view = self.history_view(policy);

        let spinner = create_spinner("Deleting...");
        if view.load().await == LoadOutcome::Failed {
            warn!("meeting list unavailable; deleting without it");
        }
        let outcome = view.delete(id).await;
        spinner.finish_and_clear();

        match outcome? {
            DeleteOutcome::Removed { status, .. } if !(200..300).contains(&status) => {
                println!(
                    "{} Removed #{} locally, server answered {}",
                    style("!").yellow().bold(),
                    id,
                    status
                );
            }
            DeleteOutcome::Removed { .. } => {
                println!("{} Deleted #{}", style("✓").green().bold(), id);
            }
            DeleteOutcome::Rejected { status } => {
                bail!("server refused to delete #{} (status {})", id, status);
            }
            DeleteOutcome::AlreadyPending => {}
        }
        println!(
            "{} {}",
            style(view.records().len()).cyan(),
            style("meetings remaining").dim()
        );
        Ok(())
    }

    pub async fn result(&self, clear: bool) -> Result<()> {
        if clear {
            match self.bridge.clear().await? {
                Some(_) => println!("{} Cleared the last result", style("✓").green().bold()),
                None => println!("{}", style("No result to clear.").dim()),
            }
            return Ok(());
        }

        self.header("Result");
        self.navigate(Route::Result).await
    }

    async fn navigate(&self, route: Route) -> Result<()> {
        debug!(route = route.path(), "navigating");
        match route {
            Route::Result => match self.bridge.load().await? {
                Some(payload) => {
                    println!("{}", style("─".repeat(60)).dim());
                    println!("{}", format_report_readable(&payload));
                }
                None => println!("{}", style("No result yet.").dim()),
            },
            Route::History => println!("Run {}", style("meeting-bot history").cyan()),
            Route::Create => println!("Run {}", style("meeting-bot create").cyan()),
        }
        Ok(())
    }
}
