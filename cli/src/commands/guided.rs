//! # Helpdesk Guided Flow
//!
//! File: cli/src/commands/guided.rs
//!
//! ## Overview
//!
//! Implements `helpdesk guided`, a fixed, scripted walkthrough for new
//! customers: it asks for a name, asks whether they need help with their
//! `account` or a `loan`, prints the matching service menu, and says goodbye.
//! Unlike `chat`, nothing here consults the response registry.
//!
use crate::core::error::{HelpdeskError, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::info;

/// # Guided Flow Arguments (`GuidedArgs`)
#[derive(Parser, Debug)]
pub struct GuidedArgs {}

/// The service the customer picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Account,
    Loan,
    Invalid,
}

impl Choice {
    fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "account" => Choice::Account,
            "loan" => Choice::Loan,
            _ => Choice::Invalid,
        }
    }
}

/// # Handle Guided Command (`handle_guided`)
///
/// Runs the guided flow on the process's stdin and stdout.
///
/// ## Errors
///
/// Returns an error if the terminal cannot be read or written.
pub async fn handle_guided(args: GuidedArgs) -> Result<()> {
    info!("Handling guided command with args: {:?}", args);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let choice = run_flow(stdin.lock(), stdout.lock())?;
    info!("Guided flow finished with choice {:?}", choice);
    Ok(())
}

/// # Run Guided Flow (`run_flow`)
///
/// Runs the scripted conversation over `input`/`output`. A missing answer
/// (end of input) is treated as a blank line.
///
/// ## Arguments
///
/// * `input`: Where the customer's answers are read from, one per line.
/// * `output`: Where prompts and menus are written.
///
/// ## Returns
///
/// * `Choice`: The service the customer picked, or `Choice::Invalid`.
///
/// ## Errors
///
/// Returns `HelpdeskError::Io` if reading or writing fails.
pub fn run_flow<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> std::result::Result<Choice, HelpdeskError> {
    let banner = "=".repeat(50);
    writeln!(output, "{}", banner)?;
    writeln!(output, "🤖 Welcome to the Helpdesk guided assistant!")?;
    writeln!(output, "{}", banner)?;

    writeln!(output)?;
    writeln!(output, "Hello! I'm here to help you with banking services.")?;
    let name = match prompt(&mut input, &mut output, "What's your name? ")?.trim() {
        "" => "there".to_string(),
        name => name.to_string(),
    };
    writeln!(output)?;
    writeln!(output, "Nice to meet you, {}!", name)?;

    writeln!(output)?;
    writeln!(output, "How can I assist you today?")?;
    writeln!(output, "Please type either 'account' or 'loan' to continue:")?;
    let choice = Choice::parse(&prompt(&mut input, &mut output, "Your choice: ")?);

    match choice {
        Choice::Account => account_menu(&mut output, &name)?,
        Choice::Loan => loan_menu(&mut output, &name)?,
        Choice::Invalid => {
            writeln!(output)?;
            writeln!(
                output,
                "❌ Sorry {}, I can only help with 'account' or 'loan' services.",
                name
            )?;
            writeln!(output, "Please run 'helpdesk guided' again if you'd like to try again.")?;
        }
    }

    writeln!(output)?;
    writeln!(output, "Thank you for using our service, {}!", name)?;
    writeln!(output, "Have a great day! 👋")?;
    writeln!(output, "{}", banner)?;
    Ok(choice)
}

/// Writes `question` and reads one line of answer, newline included.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> std::result::Result<String, HelpdeskError> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer)
}

fn account_menu<W: Write>(output: &mut W, name: &str) -> std::result::Result<(), HelpdeskError> {
    writeln!(output)?;
    writeln!(output, "📊 Account Services for {}", name)?;
    writeln!(output, "{}", "-".repeat(30))?;
    writeln!(output, "I can help you with:")?;
    for item in [
        "Checking your account balance",
        "Viewing recent transactions",
        "Updating your personal information",
        "Resolving login issues",
    ] {
        writeln!(output, "• {}", item)?;
    }
    writeln!(output)?;
    writeln!(
        output,
        "Would you like to contact our account specialist for detailed assistance?"
    )?;
    Ok(())
}

fn loan_menu<W: Write>(output: &mut W, name: &str) -> std::result::Result<(), HelpdeskError> {
    writeln!(output)?;
    writeln!(output, "💰 Loan Services for {}", name)?;
    writeln!(output, "{}", "-".repeat(30))?;
    writeln!(output, "We offer various loan options:")?;
    for item in [
        "Personal loans (starting from 5.99% APR)",
        "Home loans (competitive rates available)",
        "Business loans (tailored solutions)",
    ] {
        writeln!(output, "• {}", item)?;
    }
    writeln!(output)?;
    writeln!(
        output,
        "Our loan specialists can help you find the best option for your needs."
    )?;
    Ok(())
}
