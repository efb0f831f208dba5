//! Interactive menu front end for the market engine.
//!
//! The session is generic over its input and output so the same loop drives a
//! terminal in the binary and scripted buffers in tests.

use std::io::{self, BufRead, Write};

use core_sim::{normalize_symbol, parse_quantity, MarketEngine, Side};
use log::error;

const MENU: &str = "\n--- Stock Market Simulator ---\n\
1. Buy Stock\n\
2. Sell Stock\n\
3. Next Turn (Update Prices)\n\
4. Reset Game\n\
5. Exit\n";

pub struct ConsoleSession<'a, R, W> {
    engine: &'a mut MarketEngine,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> ConsoleSession<'a, R, W> {
    pub fn new(engine: &'a mut MarketEngine, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
        }
    }

    /// Plays turns until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if let Err(err) = self.engine.update_prices() {
                error!("failed to persist stock prices: {err}");
            }
            self.print_portfolio()?;
            self.print_stocks()?;
            write!(self.output, "{MENU}")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.trade(Side::Buy)?,
                "2" => self.trade(Side::Sell)?,
                "3" => writeln!(self.output, "Moving to the next turn...")?,
                "4" => match self.engine.reset() {
                    Ok(message) => writeln!(self.output, "{message}")?,
                    Err(err) => writeln!(self.output, "Error: {err}")?,
                },
                "5" => break,
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }

        writeln!(self.output, "Exiting simulator. Goodbye!")?;
        self.output.flush()
    }

    fn trade(&mut self, side: Side) -> io::Result<()> {
        let verb = match side {
            Side::Buy => "buy",
            Side::Sell => "sell",
        };
        let Some(symbol) = self.prompt(&format!("Enter stock symbol to {verb}: "))? else {
            return Ok(());
        };
        let symbol = normalize_symbol(&symbol);
        let Some(quantity) = self.prompt(&format!("Enter quantity for {symbol}: "))? else {
            return Ok(());
        };

        let quantity = match parse_quantity(&quantity) {
            Ok(quantity) => quantity,
            Err(err) => return writeln!(self.output, "{err}"),
        };

        let outcome = match side {
            Side::Buy => self.engine.buy(&symbol, quantity),
            Side::Sell => self.engine.sell(&symbol, quantity),
        };
        match outcome {
            Ok(receipt) => writeln!(self.output, "{receipt}"),
            Err(err) => writeln!(self.output, "Error: {err}"),
        }
    }

    fn print_portfolio(&mut self) -> io::Result<()> {
        let view = self.engine.portfolio_view();
        writeln!(self.output, "\n--- Your Portfolio ---")?;
        writeln!(self.output, "Cash: ${:.2}", view.cash)?;
        writeln!(self.output, "Holdings:")?;
        for holding in &view.holdings {
            writeln!(
                self.output,
                "  {}: {} shares (Value: ${:.2})",
                holding.symbol, holding.quantity, holding.current_value
            )?;
        }
        writeln!(self.output, "Total equity: ${:.2}", view.total_equity())?;
        writeln!(self.output, "----------------------")
    }

    fn print_stocks(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Available Stocks ---")?;
        for quote in self.engine.stocks_view() {
            writeln!(self.output, "  {}: ${:.2}", quote.symbol, quote.price)?;
        }
        writeln!(self.output, "------------------------")
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
