//! Interactive shell hosting the menu.
//!
//! Renders the item list for the current query argument and maps line
//! input onto item activation: a number activates an item, `a<number>`
//! alt-activates it, `/text` replaces the argument directly, an empty line
//! re-renders and `quit` exits. Deferred actions run through the executor;
//! when the redirect equals the argument the action was rendered under,
//! the view is refreshed in place instead of re-set.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::domain::executor::{Executor, Timing};
use crate::domain::gateway::{AdapterPower, BluetoothGateway};
use crate::domain::models::{Binding, MenuItem};
use crate::domain::router::Router;

pub struct Shell<'a> {
    gateway: &'a dyn BluetoothGateway,
    power: &'a dyn AdapterPower,
    keyword: String,
    timing: Timing,
    argument: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Refresh,
    SetArgument(String),
    Enter(usize),
    AltEnter(usize),
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Refresh,
        "q" | "quit" | "exit" => Command::Quit,
        _ => {
            if let Some(argument) = line.strip_prefix('/') {
                return Command::SetArgument(argument.trim_start().to_string());
            }
            if let Some(index) = line.strip_prefix('a') {
                if let Ok(index) = index.parse::<usize>() {
                    return Command::AltEnter(index);
                }
            }
            match line.parse::<usize>() {
                Ok(index) => Command::Enter(index),
                Err(_) => Command::Unknown,
            }
        }
    }
}

impl<'a> Shell<'a> {
    pub fn new(
        gateway: &'a dyn BluetoothGateway,
        power: &'a dyn AdapterPower,
        keyword: &str,
        timing: Timing,
    ) -> Self {
        Self {
            gateway,
            power,
            keyword: keyword.to_string(),
            timing,
            argument: String::new(),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let items = self.render().await;
            self.print_items(&items);

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match parse_command(&line) {
                Command::Quit => break,
                Command::Refresh => {}
                Command::SetArgument(argument) => self.argument = argument,
                Command::Enter(index) => match items.get(index.wrapping_sub(1)) {
                    Some(item) => self.activate(&item.on_enter).await,
                    None => println!("no such item: {index}"),
                },
                Command::AltEnter(index) => match items.get(index.wrapping_sub(1)) {
                    Some(item) => self.alt_activate(item).await,
                    None => println!("no such item: {index}"),
                },
                Command::Unknown => {
                    println!("commands: <number>, a<number>, /<argument>, quit");
                }
            }
        }

        Ok(())
    }

    async fn render(&self) -> Vec<MenuItem> {
        Router::new(self.gateway, &self.keyword)
            .render(&self.argument)
            .await
    }

    /// Items without an alt binding ignore alt-enter; it never falls back
    /// to the enter binding.
    async fn alt_activate(&mut self, item: &MenuItem) {
        if let Some(binding) = &item.on_alt_enter {
            self.activate(binding).await;
        }
    }

    async fn activate(&mut self, binding: &Binding) {
        match binding {
            Binding::Nothing => {}
            Binding::SetQuery(argument) => {
                debug!(%argument, "navigating");
                self.argument = argument.clone();
            }
            Binding::Run(action) => {
                let executor = Executor::new(self.gateway, self.power, self.timing);
                if let Some(next) = executor.execute(action).await {
                    // Same argument means refresh in place; the loop's next
                    // render pass does that on its own.
                    if next != action.last_input() {
                        self.argument = next;
                    }
                }
            }
        }
    }

    fn print_items(&self, items: &[MenuItem]) {
        println!();
        println!("> {} {}", self.keyword, self.argument);
        for (index, item) in items.iter().enumerate() {
            println!("{:>3}. {}", index + 1, item.title);
            if let Some(description) = &item.description {
                println!("     {description}");
            }
        }
    }
}
