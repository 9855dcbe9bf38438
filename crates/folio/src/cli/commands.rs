//! CLI command definitions.

use clap::{Parser, Subcommand};
use folio_core::{BookId, OutputFormat};
use std::path::PathBuf;

/// Folio - generate books from a brief, one reviewed stage at a time
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Generate books from a brief, one reviewed stage at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a book brief
    Submit {
        /// Working title
        #[arg(long)]
        title: String,

        /// Brief text
        #[arg(long, conflicts_with = "brief_file", required_unless_present = "brief_file")]
        brief: Option<String>,

        /// Read the brief from a file
        #[arg(long)]
        brief_file: Option<PathBuf>,
    },

    /// Generate outlines for every book that has a brief but no outline
    Outlines,

    /// Outline review commands
    #[command(subcommand)]
    Outline(OutlineCommands),

    /// Generate chapters for a book in order
    Chapters {
        /// Book ID
        book_id: BookId,

        /// Approve every chapter instead of stopping for review
        #[arg(long)]
        auto_approve: bool,
    },

    /// Single chapter commands
    #[command(subcommand)]
    Chapter(ChapterCommands),

    /// Check whether a book can be compiled
    Readiness {
        /// Book ID
        book_id: BookId,
    },

    /// Final review gate commands
    #[command(subcommand)]
    FinalReview(FinalReviewCommands),

    /// Compile a book to output documents
    Compile {
        /// Book ID
        book_id: BookId,

        /// Formats to produce (repeatable); all formats when omitted
        #[arg(long = "format", value_name = "FORMAT")]
        formats: Vec<OutputFormat>,

        /// Compile even if the readiness check fails
        #[arg(long)]
        force: bool,
    },

    /// Run the full pipeline for a book
    Run {
        /// Book ID; the first stored book when omitted
        book_id: Option<BookId>,

        /// Approve the outline and every chapter automatically
        #[arg(long)]
        auto_approve: bool,
    },

    /// Show the status of all books
    Status,

    /// Show detailed information about one book
    Details {
        /// Book ID
        book_id: BookId,
    },
}

/// Outline review subcommands
#[derive(Subcommand, Debug)]
pub enum OutlineCommands {
    /// Print the outline
    Show {
        /// Book ID
        book_id: BookId,
    },

    /// Approve the outline and unlock chapter generation
    Approve {
        /// Book ID
        book_id: BookId,
    },

    /// Attach revision notes to the outline
    Revise {
        /// Book ID
        book_id: BookId,

        /// Reviewer notes
        #[arg(long)]
        notes: String,
    },

    /// Regenerate the outline from its revision notes
    Regenerate {
        /// Book ID
        book_id: BookId,
    },
}

/// Single chapter subcommands
#[derive(Subcommand, Debug)]
pub enum ChapterCommands {
    /// Generate one chapter
    Generate {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
    },

    /// Approve a chapter
    Approve {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
    },

    /// Attach revision notes to a chapter
    Revise {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
        /// Reviewer notes
        #[arg(long)]
        notes: String,
    },

    /// Regenerate a chapter from its revision notes
    Regenerate {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
    },

    /// Return a chapter stuck in generating or error to pending
    Reset {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
    },

    /// Print a chapter
    Show {
        /// Book ID
        book_id: BookId,
        /// Chapter number
        number: u32,
    },
}

/// Final review subcommands
#[derive(Subcommand, Debug)]
pub enum FinalReviewCommands {
    /// Hold compilation until the final review is approved
    Request {
        /// Book ID
        book_id: BookId,
    },

    /// Release the final review hold
    Approve {
        /// Book ID
        book_id: BookId,
    },
}
