//! Interactive terminal frontend: a command loop that drives the controller
//! flows and presents form, tab, and control state.
//!
//! The loop selects between the next input line and the earliest held-label
//! deadline, so a confidence readout reverts on time even while the console
//! sits at the prompt.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{sleep_until, Duration, Instant};

use crate::controller::form::Field;
use crate::controller::state::{Control, Tab, ViewState};
use crate::controller::{Alert, Workbench};
use crate::render::{print_panel, ResultPanel};

/// A line holding only this ends multi-line field entry.
const EDIT_TERMINATOR: &str = ".";

/// Characters of a field value shown in one-line previews.
const VALUE_PREVIEW_CHARS: usize = 60;

type InputLines = Lines<BufReader<Stdin>>;

pub struct Console {
    workbench: Workbench,
}

impl Console {
    pub fn new(workbench: Workbench) -> Self {
        Self { workbench }
    }

    pub async fn run(mut self) -> Result<()> {
        banner();
        self.workbench.startup().await;
        println!("{}", tab_bar(&self.workbench.view).dimmed());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt(&self.workbench.view)?;
            let deadline = self.workbench.view.next_revert_at();
            tokio::select! {
                // next_line is cancel-safe; a revert firing mid-type does
                // not lose buffered input
                maybe_line = lines.next_line() => {
                    let Some(line) = maybe_line? else {
                        break; // stdin closed
                    };
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(command) => {
                            if !self.dispatch(command, &mut lines).await? {
                                break;
                            }
                        }
                        Err(message) => println!("{}", message.red()),
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(far_future)), if deadline.is_some() => {
                    println!();
                    for control in self.workbench.view.revert_expired_holds(Instant::now()) {
                        println!("{}", control.idle_label().dimmed());
                    }
                }
            }
        }

        println!("{}", "bye".dimmed());
        Ok(())
    }

    /// Runs one command. Returns false when the loop should exit.
    async fn dispatch(&mut self, command: Command, lines: &mut InputLines) -> Result<bool> {
        match command {
            Command::Tab(name) => match Tab::parse(&name) {
                Some(tab) => {
                    self.workbench.switch_tab(tab);
                    println!("{}", tab_bar(&self.workbench.view));
                }
                None => println!("{}", format!("no tab named {name:?}").red()),
            },

            Command::Show => self.print_form(),

            Command::Set { field, value } => match Field::parse(&field) {
                Some(field) => match self.workbench.form.set(field, &value) {
                    Ok(()) => println!("{} {}", field.name().green(), "updated".dimmed()),
                    Err(error) => println!("{}", format!("{error:#}").red()),
                },
                None => println!("{}", format!("no field named {field:?}").red()),
            },

            Command::Edit(name) => match Field::parse(&name) {
                Some(field) => self.edit_field(field, lines).await?,
                None => println!("{}", format!("no field named {name:?}").red()),
            },

            Command::Load { field, path } => match Field::parse(&field) {
                Some(field) => match read_field_file(&path).await {
                    Ok(content) => {
                        let chars = content.chars().count();
                        match self.workbench.form.set(field, &content) {
                            Ok(()) => println!(
                                "{} {}",
                                field.name().green(),
                                format!("loaded {chars} chars from {path}").dimmed()
                            ),
                            Err(error) => println!("{}", format!("{error:#}").red()),
                        }
                    }
                    Err(error) => println!("{}", format!("{error:#}").red()),
                },
                None => println!("{}", format!("no field named {field:?}").red()),
            },

            Command::Example => {
                self.workbench.load_example();
                println!("{}", "example resume, posting, and company filled in".dimmed());
            }

            Command::Generate => {
                println!("{}", Control::Generate.busy_label().yellow());
                if self.workbench.generate().await {
                    if let Some(panel) = self.workbench.last_panel() {
                        print_panel(panel);
                    }
                } else {
                    println!("{}", "generation is already running".dimmed());
                }
            }

            Command::Test => {
                println!("{}", Control::TestPrompts.busy_label().yellow());
                if self.workbench.test_custom_prompts().await {
                    if let Some(panel) = self.workbench.last_panel() {
                        print_panel(panel);
                        if matches!(panel, ResultPanel::Success { .. }) {
                            println!("{}", tab_bar(&self.workbench.view).dimmed());
                        }
                    }
                } else {
                    println!("{}", "test is already running".dimmed());
                }
            }

            Command::Analyze => {
                if self.workbench.analysis_ready() {
                    println!("{}", Control::Analyze.busy_label().yellow());
                }
                match self.workbench.analyze().await {
                    Some(alert) => print_alert(&alert),
                    None => println!("{}", self.workbench.view.label(Control::Analyze).green()),
                }
            }

            Command::Prompts => {
                self.workbench.load_prompts().await;
                self.print_prompts();
            }

            Command::QuickPrompts => {
                self.workbench.load_quick_prompts().await;
                self.print_prompts();
            }

            Command::ClearPrompts => {
                self.workbench.clear_quick_prompts();
                println!("{}", "quick prompts cleared".dimmed());
            }

            Command::Toggle(id) => {
                let expanded = self.workbench.toggle_section(&id);
                let indicator = self.workbench.view.section_indicator(&id);
                let label = if expanded { "expanded" } else { "collapsed" };
                println!("{indicator} {id} {}", format!("({label})").dimmed());
            }

            Command::Result => match self.workbench.last_panel() {
                Some(panel) => print_panel(panel),
                None => println!("{}", "no result yet".dimmed()),
            },

            Command::Help => print_help(),

            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    async fn edit_field(&mut self, field: Field, lines: &mut InputLines) -> Result<()> {
        println!(
            "{}",
            format!(
                "enter {} line by line; finish with a single '{}'",
                field.name(),
                EDIT_TERMINATOR
            )
            .dimmed()
        );

        let mut collected: Vec<String> = Vec::new();
        while let Some(line) = lines.next_line().await? {
            if line.trim() == EDIT_TERMINATOR {
                break;
            }
            collected.push(line);
        }

        let text = collected.join("\n");
        match self.workbench.form.set(field, &text) {
            Ok(()) => println!(
                "{} {}",
                field.name().green(),
                format!("updated ({} lines)", collected.len()).dimmed()
            ),
            Err(error) => println!("{}", format!("{error:#}").red()),
        }
        Ok(())
    }

    fn print_form(&self) {
        println!();
        println!("{}", tab_bar(&self.workbench.view));
        println!();
        for field in Field::ALL {
            let value = self.workbench.form.get(field);
            let placeholder = match field {
                Field::QuickKeywordPrompt => self.workbench.form.quick_keyword_placeholder.as_str(),
                Field::QuickSystemPrompt => self.workbench.form.quick_system_placeholder.as_str(),
                _ => "",
            };
            if value.is_empty() && !placeholder.is_empty() {
                println!(
                    "  {} {}",
                    format!("{:<22}", field.name()).cyan(),
                    preview(placeholder).dimmed()
                );
            } else {
                print_field_line(field.name(), &value);
            }
        }
        println!();
        for control in Control::ALL {
            println!("  {}", self.workbench.view.label(control).dimmed());
        }
        println!();
    }

    fn print_prompts(&self) {
        let form = &self.workbench.form;
        println!();
        print_field_line("keyword-prompt", &form.keyword_prompt);
        print_field_line("system-prompt", &form.system_prompt);
        print_field_line("fallback-prompt", &form.fallback_prompt);
        print_field_line("quick-keyword-prompt", &form.quick_keyword_prompt);
        print_field_line("quick-system-prompt", &form.quick_system_prompt);
        println!();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tab(String),
    Show,
    Set { field: String, value: String },
    Edit(String),
    Load { field: String, path: String },
    Example,
    Generate,
    Test,
    Analyze,
    Prompts,
    QuickPrompts,
    ClearPrompts,
    Toggle(String),
    Result,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> std::result::Result<Command, String> {
        let mut parts = line.splitn(2, char::is_whitespace);
        let word = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        let command = match word {
            "tab" => {
                if rest.is_empty() {
                    return Err("usage: tab <generate|prompts>".to_string());
                }
                Command::Tab(rest.to_string())
            }
            "show" => Command::Show,
            "set" => {
                let (field, value) = split_arg_pair(rest);
                if field.is_empty() || value.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            }
            "edit" => {
                if rest.is_empty() {
                    return Err("usage: edit <field>".to_string());
                }
                Command::Edit(rest.to_string())
            }
            "load" => {
                let (field, path) = split_arg_pair(rest);
                if field.is_empty() || path.is_empty() {
                    return Err("usage: load <field> <path>".to_string());
                }
                Command::Load {
                    field: field.to_string(),
                    path: path.to_string(),
                }
            }
            "example" => Command::Example,
            "generate" | "gen" => Command::Generate,
            "test" => Command::Test,
            "analyze" => Command::Analyze,
            "prompts" => match rest {
                "" => Command::Prompts,
                "quick" => Command::QuickPrompts,
                "clear" => Command::ClearPrompts,
                other => return Err(format!("unknown prompts variant {other:?} (quick, clear)")),
            },
            "toggle" => {
                if rest.is_empty() {
                    return Err("usage: toggle <section>".to_string());
                }
                Command::Toggle(rest.to_string())
            }
            "result" => Command::Result,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command {other:?} (try 'help')")),
        };

        Ok(command)
    }
}

/// Splits `"<first> <rest>"`, trimming the rest's edges but keeping its
/// inner spacing.
fn split_arg_pair(rest: &str) -> (&str, &str) {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default();
    let second = parts.next().unwrap_or_default().trim();
    (first, second)
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation helpers
// ────────────────────────────────────────────────────────────────────────────

fn banner() {
    println!();
    println!("{}", "Cover Letter Workbench".cyan().bold());
    println!(
        "{}",
        "terminal client for the cover-letter generation service".dimmed()
    );
    println!("{}", "type 'help' for commands".dimmed());
    println!();
}

/// The prompt carries the active tab, so the current pane is always in
/// sight.
fn prompt(view: &ViewState) -> Result<()> {
    let label = format!("workbench:{}>", view.active_tab().name());
    print!("{} ", label.green().bold());
    std::io::stdout().flush()?;
    Ok(())
}

fn print_alert(alert: &Alert) {
    println!();
    println!("{} {}", "⚠".yellow().bold(), alert.0.yellow());
    println!();
}

fn print_field_line(name: &str, value: &str) {
    let padded = format!("{:<22}", name);
    if value.is_empty() {
        println!("  {} {}", padded.cyan(), "(empty)".dimmed());
    } else {
        println!("  {} {}", padded.cyan(), preview(value));
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {} - switch the active tab (generate, prompts)", "tab <name>".green());
    println!("  {} - show the form and control state", "show".green());
    println!("  {} - set a field value", "set <field> <value>".green());
    println!("  {} - edit a field line by line, finish with '.'", "edit <field>".green());
    println!("  {} - load a file into a field", "load <field> <path>".green());
    println!("  {} - fill the example resume and posting", "example".green());
    println!("  {} - generate a cover letter", "generate".green());
    println!("  {} - generate with the custom prompt editors", "test".green());
    println!("  {} - auto-fill fields from the job description", "analyze".green());
    println!(
        "  {} - reload default prompts (also: prompts quick, prompts clear)",
        "prompts".green()
    );
    println!("  {} - toggle a collapsible section", "toggle <section>".green());
    println!("  {} - reprint the last result", "result".green());
    println!("  {} - exit", "quit".green());
    println!();
    println!("{}", "Fields:".bold());
    println!(
        "  {}",
        Field::ALL
            .iter()
            .map(|field| {
                if field.multiline() {
                    format!("{}*", field.name())
                } else {
                    field.name().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("{}", "  * multi-line; use 'edit' or 'load' rather than 'set'".dimmed());
}

/// One-line tab bar; the active tab is bracketed.
fn tab_bar(view: &ViewState) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if view.is_active(*tab) {
                format!("[{}]", tab.name())
            } else {
                tab.name().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// First line of a value, capped for one-line display.
fn preview(value: &str) -> String {
    let first_line = value.lines().next().unwrap_or_default();
    let truncated: String = first_line.chars().take(VALUE_PREVIEW_CHARS).collect();
    if truncated.chars().count() < value.chars().count() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

async fn read_field_file(path: &str) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path}"))
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400)
}
