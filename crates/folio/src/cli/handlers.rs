//! Command handlers.

use super::commands::{ChapterCommands, Commands, FinalReviewCommands, OutlineCommands};
use async_trait::async_trait;
use folio::{BookId, FolioResult, Pipeline, Readiness, RunOutcome, TextGenerator};
use folio_core::{GenerateRequest, GenerateResponse};
use folio_error::{GenerationError, GenerationErrorKind};
use std::path::PathBuf;

/// Stand-in for commands that never call the model, so they work without an API key.
#[derive(Debug, Clone)]
pub struct OfflineGenerator {
    api_key_env: String,
}

impl OfflineGenerator {
    pub fn new(api_key_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _req: &GenerateRequest) -> FolioResult<GenerateResponse> {
        Err(GenerationError::new(GenerationErrorKind::MissingApiKey(self.api_key_env.clone())).into())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

impl Commands {
    /// Whether the command may call the text generation service.
    pub fn generates(&self) -> bool {
        match self {
            Commands::Outlines | Commands::Chapters { .. } | Commands::Run { .. } => true,
            Commands::Outline(OutlineCommands::Regenerate { .. }) => true,
            Commands::Chapter(ChapterCommands::Generate { .. })
            | Commands::Chapter(ChapterCommands::Regenerate { .. }) => true,
            _ => false,
        }
    }
}

fn print_readiness(readiness: &Readiness) {
    println!(
        "Can compile: {}",
        if readiness.can_compile { "yes" } else { "no" }
    );
    println!(
        "Chapters: {}/{} generated, {} approved",
        readiness.generated, readiness.total, readiness.approved
    );
    println!("Final review: {}", readiness.final_status);
    for issue in &readiness.issues {
        println!("  - {}", issue);
    }
}

async fn read_brief(brief: Option<String>, brief_file: Option<PathBuf>) -> FolioResult<String> {
    match (brief, brief_file) {
        (Some(brief), _) => Ok(brief),
        (None, Some(path)) => tokio::fs::read_to_string(&path).await.map_err(|e| {
            folio_error::ValidationError::new(folio_error::ValidationErrorKind::InvalidInput(
                format!("cannot read brief {}: {}", path.display(), e),
            ))
            .into()
        }),
        (None, None) => Ok(String::new()),
    }
}

async fn show_status(pipeline: &Pipeline) -> FolioResult<()> {
    let books = pipeline.books().list_books().await?;
    if books.is_empty() {
        println!("No books. Submit one with: folio submit --title <TITLE> --brief <BRIEF>");
        return Ok(());
    }
    for book in books {
        let progress = pipeline.chapters().book_progress(*book.id()).await?;
        println!("{}", book.title());
        println!("  ID: {}", book.id());
        println!(
            "  Outline: {} ({})",
            if book.outline().is_some() { "generated" } else { "pending" },
            book.outline_review_state()
        );
        println!("  Output: {}", book.output_state());
        if progress.total > 0 {
            println!(
                "  Chapters: {}/{} generated, {} approved",
                progress.generated, progress.total, progress.approved
            );
        }
        for (format, path) in book.output_paths() {
            println!("  {}: {}", format, path);
        }
    }
    Ok(())
}

async fn show_details(pipeline: &Pipeline, book_id: BookId) -> FolioResult<()> {
    let book = pipeline.books().get_book(book_id).await?;
    let progress = pipeline.chapters().book_progress(book_id).await?;

    println!("{}", book.title());
    println!("  ID: {}", book.id());
    println!("  Created: {}", book.created_at());
    println!("Outline");
    println!("  Brief: {}", if book.has_brief() { "yes" } else { "no" });
    println!(
        "  Outline: {}",
        if book.outline().is_some() { "generated" } else { "pending" }
    );
    println!(
        "  Revision notes: {}",
        if book.outline_feedback().is_some() { "pending" } else { "none" }
    );
    println!("  Review: {} (next: {})", book.outline_review_state(), book.outline_action());
    println!("Chapters");
    if progress.chapters.is_empty() {
        println!("  No chapters initialized");
    }
    for chapter in &progress.chapters {
        println!(
            "  {:>3}. {} [{} / {}, revision {}]",
            chapter.chapter_number,
            chapter.title,
            chapter.content_state,
            chapter.review_state,
            chapter.revision
        );
    }
    println!("Compilation");
    println!("  Final review: {}", book.final_review_state());
    println!("  Output: {}", book.output_state());
    for (format, path) in book.output_paths() {
        println!("  {}: {}", format, path);
    }
    Ok(())
}

async fn outline_command(pipeline: &Pipeline, command: OutlineCommands) -> FolioResult<()> {
    match command {
        OutlineCommands::Show { book_id } => {
            let book = pipeline.books().get_book(book_id).await?;
            match book.outline() {
                Some(outline) => println!("{}", outline),
                None => println!("No outline yet for '{}'", book.title()),
            }
        }
        OutlineCommands::Approve { book_id } => {
            let book = pipeline.outlines().approve_outline(book_id).await?;
            println!("Outline approved for '{}'", book.title());
        }
        OutlineCommands::Revise { book_id, notes } => {
            pipeline
                .outlines()
                .request_outline_revision(book_id, &notes)
                .await?;
            println!("Revision notes saved; run `folio outline regenerate {}`", book_id);
        }
        OutlineCommands::Regenerate { book_id } => {
            let book = pipeline.outlines().regenerate_outline(book_id).await?;
            println!("{}", book.outline().as_deref().unwrap_or_default());
        }
    }
    Ok(())
}

async fn chapter_command(pipeline: &Pipeline, command: ChapterCommands) -> FolioResult<()> {
    let chapters = pipeline.chapters();
    match command {
        ChapterCommands::Generate { book_id, number } => {
            let chapter = chapters.generate(book_id, number).await?;
            println!("Chapter {} generated: {}", chapter.chapter_number(), chapter.title());
        }
        ChapterCommands::Approve { book_id, number } => {
            chapters.approve_chapter(book_id, number).await?;
            println!("Chapter {} approved", number);
        }
        ChapterCommands::Revise {
            book_id,
            number,
            notes,
        } => {
            chapters
                .request_chapter_revision(book_id, number, &notes)
                .await?;
            println!("Revision notes saved for chapter {}", number);
        }
        ChapterCommands::Regenerate { book_id, number } => {
            let chapter = chapters.regenerate_chapter(book_id, number).await?;
            println!(
                "Chapter {} regenerated (revision {})",
                chapter.chapter_number(),
                chapter.revision()
            );
        }
        ChapterCommands::Reset { book_id, number } => {
            let chapter = chapters.reset_chapter(book_id, number).await?;
            println!("Chapter {} is {}", number, chapter.content_state());
        }
        ChapterCommands::Show { book_id, number } => {
            let chapter = chapters.chapter(book_id, number).await?;
            println!("Chapter {}: {}", chapter.chapter_number(), chapter.title());
            println!(
                "[{} / {}, next: {}]",
                chapter.content_state(),
                chapter.review_state(),
                chapter.action()
            );
            if let Some(content) = chapter.content() {
                println!();
                println!("{}", content);
            }
        }
    }
    Ok(())
}

/// Execute a parsed command against a wired pipeline.
pub async fn execute(command: Commands, pipeline: &Pipeline) -> FolioResult<()> {
    match command {
        Commands::Submit {
            title,
            brief,
            brief_file,
        } => {
            let brief = read_brief(brief, brief_file).await?;
            let book = pipeline.books().submit_brief(&title, &brief).await?;
            println!("{}", book.id());
        }

        Commands::Outlines => {
            let batch = pipeline.outlines().generate_pending_outlines().await?;
            println!(
                "{} generated, {} skipped (no brief), {} failed",
                batch.generated.len(),
                batch.skipped.len(),
                batch.failed.len()
            );
            for (book_id, error) in &batch.failed {
                println!("  {}: {}", book_id, error);
            }
        }

        Commands::Outline(command) => outline_command(pipeline, command).await?,

        Commands::Chapters {
            book_id,
            auto_approve,
        } => {
            let report = pipeline.chapters().generate_all(book_id, auto_approve).await?;
            println!("Generated chapters: {:?}", report.generated_numbers());
            if !report.auto_approved.is_empty() {
                println!("Auto-approved: {:?}", report.auto_approved);
            }
            if let Some(reason) = &report.halted {
                println!("Stopped: {}", reason);
            }
        }

        Commands::Chapter(command) => chapter_command(pipeline, command).await?,

        Commands::Readiness { book_id } => {
            let readiness = pipeline.compiler().check_readiness(book_id).await?;
            print_readiness(&readiness);
        }

        Commands::FinalReview(FinalReviewCommands::Request { book_id }) => {
            pipeline.books().request_final_review(book_id).await?;
            println!("Final review requested; compilation is on hold");
        }

        Commands::FinalReview(FinalReviewCommands::Approve { book_id }) => {
            pipeline.books().approve_final_review(book_id).await?;
            println!("Final review approved");
        }

        Commands::Compile {
            book_id,
            formats,
            force,
        } => {
            let report = pipeline.compiler().compile(book_id, &formats, force).await?;
            for (format, path) in report.paths() {
                println!("{}: {}", format, path);
            }
            for (format, error) in report.errors() {
                println!("{} failed: {}", format, error);
            }
            println!("Output: {}", report.output_state);
        }

        Commands::Run {
            book_id,
            auto_approve,
        } => {
            let book_id = match book_id {
                Some(id) => id,
                None => pipeline.first_book().await?,
            };
            let report = pipeline.run(book_id, auto_approve).await?;
            match &report.outcome {
                RunOutcome::Compiled { report } => {
                    for (format, path) in report.paths() {
                        println!("{}: {}", format, path);
                    }
                }
                outcome => println!("Stopped: {}", outcome),
            }
        }

        Commands::Status => show_status(pipeline).await?,

        Commands::Details { book_id } => show_details(pipeline, book_id).await?,
    }

    Ok(())
}
