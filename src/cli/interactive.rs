//! `tm interactive` - menu-driven interface over the task store

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::task::{self, Priority, Task, TaskId, TaskStatus, TaskStore, TaskUpdate};

const MENU_RULE: &str = "==================================================";

pub struct Menu<'a, R, W> {
    store: &'a mut TaskStore,
    input: R,
    out: W,
}

enum PriorityAnswer {
    Keep,
    Value(u8),
    OutOfRange,
    NotANumber,
}

fn parse_priority(answer: &str) -> PriorityAnswer {
    if answer.is_empty() {
        return PriorityAnswer::Keep;
    }
    match answer.parse::<i64>() {
        Ok(n) => match Priority::try_from(n) {
            Ok(priority) => PriorityAnswer::Value(priority.value()),
            Err(_) => PriorityAnswer::OutOfRange,
        },
        Err(_) => PriorityAnswer::NotANumber,
    }
}

fn non_empty(answer: String) -> Option<String> {
    (!answer.is_empty()).then_some(answer)
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Run until the user picks exit or input runs out.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to tm, the task tracker!")?;

        loop {
            self.display_menu()?;
            let Some(choice) = self.ask("\nEnter your choice (0-9): ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.add_task()?,
                "2" => self.show_list(None, "All Tasks")?,
                "3" => self.show_list(Some(TaskStatus::Pending), "Pending Tasks")?,
                "4" => self.show_list(Some(TaskStatus::Done), "Completed Tasks")?,
                "5" => self.mark_done()?,
                "6" => self.mark_pending()?,
                "7" => self.update_task()?,
                "8" => self.remove_task()?,
                "9" => self.show_details()?,
                "0" => {
                    writeln!(self.out, "\nThank you for using tm!")?;
                    break;
                }
                _ => writeln!(
                    self.out,
                    "\nInvalid choice! Please enter a number between 0-9."
                )?,
            }

            if self.ask("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }
        Ok(())
    }

    fn display_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", MENU_RULE)?;
        writeln!(self.out, "           TASK TRACKER")?;
        writeln!(self.out, "{}", MENU_RULE)?;
        for line in [
            "1. Add Task",
            "2. List All Tasks",
            "3. List Pending Tasks",
            "4. List Completed Tasks",
            "5. Mark Task as Done",
            "6. Mark Task as Pending",
            "7. Update Task",
            "8. Remove Task",
            "9. Show Task Details",
            "0. Exit",
        ] {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out, "{}", MENU_RULE)?;
        Ok(())
    }

    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        Ok(super::prompt(&mut self.input, &mut self.out, message)?)
    }

    fn ask_task_id(&mut self, message: &str) -> Result<Option<TaskId>> {
        let Some(answer) = self.ask(message)? else {
            return Ok(None);
        };
        match answer.parse::<TaskId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.out, "Please enter a valid task ID!")?;
                Ok(None)
            }
        }
    }

    fn show_list(&mut self, status: Option<TaskStatus>, title: &str) -> Result<()> {
        let tasks = self.store.list(status);
        super::write_task_list(&mut self.out, &tasks, title)?;
        Ok(())
    }

    /// Validation failures are shown to the user; anything else aborts the menu.
    fn report_added(&mut self, result: task::Result<Task>) -> Result<()> {
        match result {
            Ok(task) => writeln!(self.out, "\n✓ Task added successfully: {}", task)?,
            Err(e) if e.is_validation() => writeln!(self.out, "{}", e)?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn add_task(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Add New Task ---")?;
        let Some(title) = self.ask("Enter task title: ")? else {
            return Ok(());
        };
        if title.is_empty() {
            writeln!(self.out, "Title cannot be empty!")?;
            return Ok(());
        }

        let Some(description) = self.ask("Enter task description (optional): ")? else {
            return Ok(());
        };
        let description = non_empty(description);

        let priority = loop {
            let Some(answer) = self.ask("Enter priority (1-10, default 5): ")? else {
                return Ok(());
            };
            match parse_priority(&answer) {
                PriorityAnswer::Keep => break None,
                PriorityAnswer::Value(p) => break Some(p),
                PriorityAnswer::OutOfRange => {
                    writeln!(self.out, "Priority must be between 1 and 10!")?
                }
                PriorityAnswer::NotANumber => writeln!(self.out, "Please enter a valid number!")?,
            }
        };

        let result = self.store.add(&title, description.as_deref(), priority);
        self.report_added(result)
    }

    fn mark_done(&mut self) -> Result<()> {
        self.show_list(Some(TaskStatus::Pending), "Pending Tasks")?;
        let Some(id) = self.ask_task_id("\nEnter task ID to mark as done: ")? else {
            return Ok(());
        };

        if self.store.mark_done(id)? {
            writeln!(self.out, "✓ Task {} marked as done", id)?;
        } else {
            super::write_not_found(&mut self.out, id)?;
        }
        Ok(())
    }

    fn mark_pending(&mut self) -> Result<()> {
        self.show_list(Some(TaskStatus::Done), "Completed Tasks")?;
        let Some(id) = self.ask_task_id("\nEnter task ID to mark as pending: ")? else {
            return Ok(());
        };

        if self.store.mark_pending(id)? {
            writeln!(self.out, "✓ Task {} marked as pending", id)?;
        } else {
            super::write_not_found(&mut self.out, id)?;
        }
        Ok(())
    }

    fn update_task(&mut self) -> Result<()> {
        self.show_list(None, "All Tasks")?;
        let Some(id) = self.ask_task_id("\nEnter task ID to update: ")? else {
            return Ok(());
        };
        let Some(current) = self.store.get(id).cloned() else {
            super::write_not_found(&mut self.out, id)?;
            return Ok(());
        };

        writeln!(self.out, "\nCurrent task: {}", current)?;
        writeln!(self.out, "Leave empty to keep current value:")?;

        let Some(title) = self.ask(&format!("New title (current: {}): ", current.title))? else {
            return Ok(());
        };
        let Some(description) =
            self.ask(&format!("New description (current: {}): ", current.description))?
        else {
            return Ok(());
        };
        let Some(priority) =
            self.ask(&format!("New priority (current: {}): ", current.priority))?
        else {
            return Ok(());
        };

        let priority = match parse_priority(&priority) {
            PriorityAnswer::Keep => None,
            PriorityAnswer::Value(p) => Some(p),
            PriorityAnswer::OutOfRange => {
                writeln!(
                    self.out,
                    "Priority must be between 1 and 10! Keeping current value."
                )?;
                None
            }
            PriorityAnswer::NotANumber => {
                writeln!(self.out, "Invalid priority! Keeping current value.")?;
                None
            }
        };

        let changes = TaskUpdate {
            title: non_empty(title),
            description: non_empty(description),
            priority,
        };

        if self.store.update(id, changes)? {
            writeln!(self.out, "✓ Task {} updated successfully", id)?;
            let updated = self.store.require(id)?;
            writeln!(self.out, "Updated task: {}", updated)?;
        } else {
            writeln!(self.out, "✗ Failed to update task {}", id)?;
        }
        Ok(())
    }

    fn remove_task(&mut self) -> Result<()> {
        self.show_list(None, "All Tasks")?;
        let Some(id) = self.ask_task_id("\nEnter task ID to remove: ")? else {
            return Ok(());
        };
        let Some(title) = self.store.get(id).map(|t| t.title.clone()) else {
            super::write_not_found(&mut self.out, id)?;
            return Ok(());
        };

        let confirm = self
            .ask(&format!(
                "Are you sure you want to remove '{}'? (y/N): ",
                title
            ))?
            .unwrap_or_default();

        if confirm.to_lowercase() == "y" {
            self.store.remove(id)?;
            writeln!(self.out, "✓ Task {} removed successfully", id)?;
        } else {
            writeln!(self.out, "Task removal cancelled")?;
        }
        Ok(())
    }

    fn show_details(&mut self) -> Result<()> {
        self.show_list(None, "All Tasks")?;
        let Some(id) = self.ask_task_id("\nEnter task ID to view details: ")? else {
            return Ok(());
        };

        match self.store.get(id) {
            Some(task) => {
                writeln!(self.out, "\n--- Task Details ---")?;
                super::write_task_details(&mut self.out, task)?;
            }
            None => super::write_not_found(&mut self.out, id)?,
        }
        Ok(())
    }
}
