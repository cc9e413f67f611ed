use std::io::{self, BufRead, Write};

use anyhow::Result;
use client_core::{EditMode, HospitalListController, Outcome};
use shared::domain::HospitalId;

use crate::{render, StdinConfirm};

const HELP: &str = "\
commands:
  list              show the hospitals
  reload            fetch the list again
  edit <id>         load a hospital into the form
  new               leave edit mode with an empty form
  name <text>       set the name field
  address <text>    set the address field
  submit            add or update, depending on the form mode
  delete <id>       delete a hospital (asks first)
  form              show the form
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    List,
    Reload,
    Edit(HospitalId),
    New,
    Name(String),
    Address(String),
    Submit,
    Delete(HospitalId),
    Form,
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match (word, rest) {
            ("list" | "ls", "") => Self::List,
            ("reload", "") => Self::Reload,
            ("edit", id) if !id.is_empty() => Self::Edit(HospitalId::new(id)),
            ("new", "") => Self::New,
            ("name", text) => Self::Name(text.to_string()),
            ("address", text) => Self::Address(text.to_string()),
            ("submit", "") => Self::Submit,
            ("delete" | "rm", id) if !id.is_empty() => Self::Delete(HospitalId::new(id)),
            ("form", "") => Self::Form,
            ("help" | "?", "") => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            _ => return Err(format!("unrecognized command '{line}', try 'help'")),
        };
        Ok(Some(command))
    }
}

pub(crate) async fn run(controller: &HospitalListController) -> Result<()> {
    println!("{HELP}");
    if let Some(outcome) = controller.mount().await {
        show(outcome);
    }
    print!("{}", render::hospital_list(&controller.hospitals().await));

    loop {
        let prompt = match controller.edit_mode().await {
            EditMode::Viewing => "hospitals".to_string(),
            EditMode::Editing(id) => format!("hospitals:edit {id}"),
        };
        print!("{prompt}> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::List => {
                print!("{}", render::hospital_list(&controller.hospitals().await));
            }
            ShellCommand::Reload => {
                show(controller.load().await);
                print!("{}", render::hospital_list(&controller.hospitals().await));
            }
            ShellCommand::Edit(id) => {
                if controller.begin_edit(&id).await {
                    print!("{}", render::form(&controller.form().await));
                } else {
                    println!("no hospital with id {id}");
                }
            }
            ShellCommand::New => controller.begin_create().await,
            ShellCommand::Name(text) => controller.set_name(text).await,
            ShellCommand::Address(text) => controller.set_address(text).await,
            ShellCommand::Submit => {
                show(controller.submit().await);
                print!("{}", render::hospital_list(&controller.hospitals().await));
            }
            ShellCommand::Delete(id) => {
                show(controller.delete(&id, &StdinConfirm).await);
                print!("{}", render::hospital_list(&controller.hospitals().await));
            }
            ShellCommand::Form => print!("{}", render::form(&controller.form().await)),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

fn show(outcome: Outcome) {
    match outcome {
        Outcome::Applied => {}
        Outcome::Alert(message) => println!("! {message}"),
        Outcome::Failed(message) => println!("{message}"),
        Outcome::Cancelled => println!("Cancelled."),
        Outcome::Discarded => println!("Session closed; response ignored."),
    }
}
