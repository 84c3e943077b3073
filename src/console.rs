//! Line-oriented terminal front end for the product workflow.

use std::io::Write;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::debug;

use crate::app_system::SystemError;
use crate::confirmation::{ConfirmationPrompt, Decision};
use crate::display::{department_name, format_price, format_status};
use crate::domain::{DepartmentId, ProductDraft, ProductId};
use crate::workflow::{
    DeleteOutcome, EditTarget, Notice, SaveOutcome, Severity, Transition, WorkflowController,
    WorkflowState,
};

const HELP: &str = "\
Commands:
  list                     reload and show products
  departments              reload and show departments
  new                      start a new product
  edit <id>                edit an existing product
  set <field> <value>      set code, description, department, price or active
  show                     show the open draft
  save                     save the open draft
  cancel                   close the editor without saving
  delete <id>              delete a product (asks for confirmation)
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq)]
pub enum DraftField {
    Code(String),
    Description(String),
    Department(DepartmentId),
    Price(Decimal),
    Active(bool),
}

impl DraftField {
    fn apply(self, draft: &mut ProductDraft) {
        match self {
            DraftField::Code(code) => draft.code = code,
            DraftField::Description(description) => draft.description = description,
            DraftField::Department(id) => draft.department_id = Some(id),
            DraftField::Price(price) => draft.price = Some(price),
            DraftField::Active(active) => draft.active = active,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Departments,
    New,
    Edit(ProductId),
    Set(DraftField),
    Show,
    Save,
    Cancel,
    Delete(ProductId),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

fn parse_id(value: Option<&str>, usage: &'static str) -> Result<i64, CommandError> {
    let value = value.ok_or(CommandError::Usage(usage))?;
    value.parse().map_err(|_| CommandError::InvalidValue {
        field: "id",
        value: value.to_string(),
    })
}

fn parse_field(field: &str, value: &str) -> Result<DraftField, CommandError> {
    let invalid = |field: &'static str| CommandError::InvalidValue {
        field,
        value: value.to_string(),
    };
    match field {
        "code" => Ok(DraftField::Code(value.to_string())),
        "description" => Ok(DraftField::Description(value.to_string())),
        "department" => value
            .parse()
            .map(DraftField::Department)
            .map_err(|_| invalid("department")),
        "price" => value
            .replace(',', ".")
            .parse::<Decimal>()
            .map(DraftField::Price)
            .map_err(|_| invalid("price")),
        "active" => match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "active" => Ok(DraftField::Active(true)),
            "false" | "no" | "n" | "inactive" => Ok(DraftField::Active(false)),
            _ => Err(invalid("active")),
        },
        _ => Err(CommandError::InvalidValue {
            field: "field",
            value: field.to_string(),
        }),
    }
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "list" | "ls" => Command::List,
        "departments" => Command::Departments,
        "new" => Command::New,
        "edit" => Command::Edit(parse_id(rest.split_whitespace().next(), "edit <id>")?),
        "delete" | "rm" => {
            Command::Delete(parse_id(rest.split_whitespace().next(), "delete <id>")?)
        }
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage("set <field> <value>"))?;
            Command::Set(parse_field(field, value.trim())?)
        }
        "show" => Command::Show,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Keeps the notices not printed yet and advances `next_unseen` past them.
fn unseen_notices(notices: Vec<Notice>, next_unseen: &mut u64) -> Vec<Notice> {
    let fresh: Vec<Notice> = notices.into_iter().filter(|n| n.id >= *next_unseen).collect();
    if let Some(last) = fresh.last() {
        *next_unseen = last.id + 1;
    }
    fresh
}

fn describe(state: WorkflowState) -> String {
    match state {
        WorkflowState::Browsing => "browsing".to_string(),
        WorkflowState::Editing(EditTarget::New) => "creating a product".to_string(),
        WorkflowState::Editing(EditTarget::Existing(id)) => format!("editing product {id}"),
        WorkflowState::AwaitingDeleteConfirmation(id) => {
            format!("confirming deletion of product {id}")
        }
    }
}

pub struct Console<'a> {
    controller: &'a WorkflowController,
    prompts: &'a mut mpsc::Receiver<ConfirmationPrompt>,
    lines: Lines<BufReader<Stdin>>,
    next_unseen: u64,
}

impl<'a> Console<'a> {
    pub fn new(
        controller: &'a WorkflowController,
        prompts: &'a mut mpsc::Receiver<ConfirmationPrompt>,
    ) -> Self {
        Self {
            controller,
            prompts,
            lines: BufReader::new(tokio::io::stdin()).lines(),
            next_unseen: 0,
        }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run(mut self) -> Result<(), SystemError> {
        println!("{HELP}");
        self.print_products().await;
        self.print_notices().await;

        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    debug!(?command, "Executing command");
                    self.execute(command).await?;
                }
                Err(e) => println!("{e}"),
            }
            self.print_notices().await;
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<(), SystemError> {
        let controller = self.controller;
        match command {
            Command::List => {
                controller.reload_products().await;
                self.print_products().await;
            }
            Command::Departments => {
                controller.reload_departments().await;
                for department in controller.departments().await.iter() {
                    println!("{:>4}  {}", department.id, department.name);
                }
            }
            Command::New => Self::report(controller.start_create().await),
            Command::Edit(id) => {
                Self::report(controller.start_edit(id).await);
                self.print_draft().await;
            }
            Command::Set(field) => {
                Self::report(controller.edit_draft(|draft| field.apply(draft)).await)
            }
            Command::Show => self.print_draft().await,
            Command::Save => match controller.save().await {
                SaveOutcome::Created(_) | SaveOutcome::Updated(_) => self.print_products().await,
                SaveOutcome::Invalid(fields) => {
                    println!("Check these fields: {}", fields.join(", "))
                }
                SaveOutcome::Busy => println!("A save for this product is already in progress."),
                SaveOutcome::Rejected { from } => {
                    println!("Nothing to save while {}.", describe(from))
                }
                SaveOutcome::Failed(_) => {}
            },
            Command::Cancel => Self::report(controller.cancel().await),
            Command::Delete(id) => {
                if self.delete(id).await? == DeleteOutcome::Deleted {
                    self.print_products().await;
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }

    /// Runs the delete while answering the confirmation prompt it raises.
    async fn delete(&mut self, id: ProductId) -> Result<DeleteOutcome, SystemError> {
        let controller = self.controller;
        let delete = controller.request_delete(id);
        tokio::pin!(delete);

        loop {
            tokio::select! {
                outcome = &mut delete => {
                    match &outcome {
                        DeleteOutcome::Busy => println!("Product {id} is already being changed."),
                        DeleteOutcome::Rejected { from } => {
                            println!("Cannot delete while {}.", describe(*from))
                        }
                        _ => {}
                    }
                    return Ok(outcome);
                }
                Some(prompt) = self.prompts.recv() => {
                    print!("{} [y/N] ", prompt.message);
                    std::io::stdout().flush()?;
                    let answer = self.lines.next_line().await?;
                    let confirmed = matches!(
                        answer.as_deref().map(str::trim),
                        Some("y" | "Y" | "yes" | "Yes")
                    );
                    let _ = prompt.respond_to.send(Decision::from(confirmed));
                }
            }
        }
    }

    fn report(transition: Transition) {
        if let Transition::Rejected { from } = transition {
            println!("Not available while {}.", describe(from));
        }
    }

    async fn print_products(&self) {
        let products = self.controller.products().await;
        let departments = self.controller.departments().await;
        if products.is_empty() {
            println!("No products.");
            return;
        }
        println!(
            "{:>4}  {:<10} {:<30} {:<16} {:>16}  Status",
            "Id", "Code", "Description", "Department", "Price"
        );
        for product in products.iter() {
            println!(
                "{:>4}  {:<10} {:<30} {:<16} {:>16}  {}",
                product.id,
                product.code,
                product.description,
                department_name(&departments, product.department_id),
                format_price(product.price),
                format_status(product.active),
            );
        }
    }

    async fn print_draft(&self) {
        let state = self.controller.state().await;
        let Some(draft) = self.controller.draft().await else {
            println!("No open draft ({}).", describe(state));
            return;
        };
        let departments = self.controller.departments().await;
        println!("Draft ({}):", describe(state));
        println!("  code:        {}", draft.code);
        println!("  description: {}", draft.description);
        match draft.department_id {
            Some(id) => println!("  department:  {} ({})", id, department_name(&departments, id)),
            None => println!("  department:  -"),
        }
        match draft.price {
            Some(price) => println!("  price:       {}", format_price(price)),
            None => println!("  price:       -"),
        }
        println!("  active:      {}", format_status(draft.active));
        println!("  valid:       {}", if draft.is_valid() { "yes" } else { "no" });
    }

    /// Prints each notice once, the first time it is seen while still active.
    async fn print_notices(&mut self) {
        let notices = self.controller.notices().await;
        for notice in unseen_notices(notices, &mut self.next_unseen) {
            let label = match notice.severity {
                Severity::Success => "ok",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            println!("[{label}] {}", notice.message);
        }
    }
}
