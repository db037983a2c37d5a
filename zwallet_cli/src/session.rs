//! Polling loop shared by `ticker` and `monitor`.
//!
//! Each iteration fetches a quote, compares it with the previous reading and
//! hands the result to the presenter. In follow mode the loop sleeps between
//! polls until interrupted; otherwise it polls once.
use std::io::Write;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use zwallet_common::Result;
use zwallet_common::exchange::ExchangeClient;
use zwallet_common::monitor::MonitorTarget;
use zwallet_common::quote::{Reading, fetch_quote};

use crate::args::PollArgs;
use crate::presenter::Presenter;

/// Granularity at which the follow-mode sleep checks for shutdown.
const SHUTDOWN_POLL_MS: u64 = 100;
/// Exit code after Ctrl+C, as shells report `SIGINT`.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Ctrl+C state shared between the signal handler and the polling loop.
///
/// Before polling starts (e.g. while prompting) nothing checks for a stop
/// request, so the handler has to end the process itself.
#[derive(Debug, Default)]
pub struct Interrupt {
    requested: AtomicBool,
    polling: AtomicBool,
}

impl Interrupt {
    /// Creates an interrupt state with no request and no polling loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a stop request. Returns `true` if the polling loop will pick it
    /// up, `false` if the caller must terminate the process.
    pub fn request(&self) -> bool {
        self.requested.store(true, Ordering::SeqCst);
        self.polling.load(Ordering::SeqCst)
    }

    /// Returns `true` once a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Marks the polling loop as running; later requests are handled by it.
    fn start_polling(&self) {
        self.polling.store(true, Ordering::SeqCst);
    }
}

/// Loop pacing and output options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Keep polling until interrupted.
    pub follow: bool,
    /// Pause between two polls in follow mode.
    pub interval: Duration,
    /// Print JSON snapshots instead of the formatted ticker.
    pub json: bool,
}

impl From<&PollArgs> for SessionOptions {
    fn from(args: &PollArgs) -> Self {
        SessionOptions {
            follow: args.follow,
            interval: Duration::from_secs(args.sleep_interval),
            json: args.json,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Polling finished normally.
    Done,
    /// The exchange answered without usable data.
    ExchangeError,
    /// Ctrl+C stopped the polling loop.
    Interrupted,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::ExchangeError => 1,
            Outcome::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// Runs the polling loop until it completes, the exchange reports an error
/// or `interrupt` is requested.
///
/// Transport failures end the loop with `Err`.
pub fn run<C, W, E>(
    client: &C,
    presenter: &mut Presenter<W, E>,
    target: Option<&MonitorTarget>,
    options: &SessionOptions,
    interrupt: &Interrupt,
) -> Result<Outcome>
where
    C: ExchangeClient + ?Sized,
    W: Write,
    E: Write,
{
    interrupt.start_polling();
    let mut previous: Option<Reading> = None;
    if options.follow {
        presenter.clear()?;
    }

    loop {
        let quote = fetch_quote(client)?;
        let reading = quote.reading();
        let trends = reading
            .map(|r| r.trends(previous.as_ref()))
            .unwrap_or_default();
        let position = match (target, reading) {
            (Some(target), Some(reading)) => Some(target.position(reading.last)),
            _ => None,
        };

        if options.json {
            presenter.json(&quote, &trends, target, position.as_ref())?;
        } else {
            presenter.ticker(&quote, &trends)?;
            if let (Some(target), Some(position)) = (target, position.as_ref()) {
                presenter.monitor(target, position)?;
            }
        }

        if quote.is_error() {
            info!("Exchange reported an error: {}", quote.message);
            return Ok(Outcome::ExchangeError);
        }
        previous = reading;

        if !options.follow {
            break;
        }
        if !sleep_unless_interrupted(options.interval, interrupt) {
            info!("Polling interrupted");
            return Ok(Outcome::Interrupted);
        }
        presenter.clear()?;
    }

    info!("Polling stopped");
    Ok(Outcome::Done)
}

/// Sleeps for `interval`, returning `false` early if a stop was requested.
fn sleep_unless_interrupted(interval: Duration, interrupt: &Interrupt) -> bool {
    debug!("Sleeping {:?} before the next poll", interval);
    let deadline = Instant::now() + interval;
    let tick = Duration::from_millis(SHUTDOWN_POLL_MS);
    loop {
        if interrupt.is_requested() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(tick.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use zwallet_common::WalletError;
    use zwallet_common::exchange::RawPayload;
    use zwallet_common::format::CurrencyFormat;

    /// Serves queued payloads; requests a stop once the queue is drained.
    struct ScriptedClient<'a> {
        payloads: RefCell<VecDeque<Value>>,
        interrupt: &'a Interrupt,
    }

    impl<'a> ScriptedClient<'a> {
        fn new(payloads: Vec<Value>, interrupt: &'a Interrupt) -> Self {
            Self {
                payloads: RefCell::new(payloads.into()),
                interrupt,
            }
        }
    }

    impl ExchangeClient for ScriptedClient<'_> {
        fn get_ticker(&self) -> std::result::Result<RawPayload, WalletError> {
            let mut payloads = self.payloads.borrow_mut();
            let payload = payloads.pop_front().ok_or_else(|| {
                WalletError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "offline"))
            })?;
            if payloads.is_empty() {
                self.interrupt.request();
            }
            Ok(payload)
        }
    }

    fn payload(buy: f64, sell: f64, last: f64) -> Value {
        json!({"data":{"buy":buy,"sell":sell,"last":last,"high":115,"low":95,"volume":10,"trades_quantity":3,"date":"2024-01-01T12:00:00Z"}})
    }

    fn once() -> SessionOptions {
        SessionOptions {
            follow: false,
            interval: Duration::from_millis(1),
            json: false,
        }
    }

    fn follow() -> SessionOptions {
        SessionOptions {
            follow: true,
            ..once()
        }
    }

    fn presenter() -> Presenter<Vec<u8>, Vec<u8>> {
        Presenter::new(Vec::new(), Vec::new(), CurrencyFormat::brl(), false)
    }

    fn output(presenter: Presenter<Vec<u8>, Vec<u8>>) -> String {
        String::from_utf8(presenter.into_parts().0).unwrap()
    }

    #[test]
    fn single_poll_prints_ticker() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![payload(100.0, 110.0, 105.0)], &interrupt);
        let mut presenter = presenter();

        let outcome = run(&client, &mut presenter, None, &once(), &interrupt).unwrap();

        assert_eq!(outcome, Outcome::Done);
        let text = output(presenter);
        assert!(text.contains("Venda:  R$ 110,00"));
        assert!(!text.contains("BRL Delta"));
    }

    #[test]
    fn error_payload_ends_with_exchange_error() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![json!({})], &interrupt);
        let mut presenter = presenter();

        let outcome = run(&client, &mut presenter, None, &follow(), &interrupt).unwrap();

        assert_eq!(outcome, Outcome::ExchangeError);
        let (out, errors) = presenter.into_parts();
        assert!(!String::from_utf8(out).unwrap().contains("No data"));
        assert!(String::from_utf8(errors)
            .unwrap()
            .contains("No data from exchange BitcoinTrade"));
    }

    #[test]
    fn transport_error_is_propagated() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(Vec::new(), &interrupt);
        let mut presenter = presenter();

        assert!(run(&client, &mut presenter, None, &once(), &interrupt).is_err());
    }

    #[test]
    fn follow_mode_compares_with_previous_poll() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(
            vec![payload(100.0, 110.0, 105.0), payload(99.0, 111.0, 105.0)],
            &interrupt,
        );
        let mut presenter = presenter();

        run(&client, &mut presenter, None, &follow(), &interrupt).unwrap();

        let text = output(presenter);
        assert_eq!(text.matches("BitcoinTrade Quotes").count(), 2);
        assert!(text.contains("Venda:  R$ 110,00  \n"));
        assert!(text.contains("Venda:  R$ 111,00 \u{2B08}\n"));
        assert!(text.contains("Último: R$ 105,00 \u{2B0C}\n"));
        assert!(text.contains("Compra: R$ 99,00 \u{2B0A}\n"));
    }

    #[test]
    fn ctrl_c_in_follow_mode_exits_interrupted() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![payload(100.0, 110.0, 105.0)], &interrupt);
        let mut presenter = presenter();

        let outcome = run(&client, &mut presenter, None, &follow(), &interrupt).unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(outcome.code(), 130);
    }

    #[test]
    fn ctrl_c_after_single_poll_is_done() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![payload(100.0, 110.0, 105.0)], &interrupt);
        let mut presenter = presenter();

        let outcome = run(&client, &mut presenter, None, &once(), &interrupt).unwrap();

        assert_eq!(outcome, Outcome::Done);
    }

    #[test]
    fn ctrl_c_before_polling_must_terminate() {
        let interrupt = Interrupt::new();

        assert!(!interrupt.request());
        assert!(interrupt.is_requested());
    }

    #[test]
    fn ctrl_c_while_polling_is_left_to_the_loop() {
        let interrupt = Interrupt::new();
        interrupt.start_polling();

        assert!(interrupt.request());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::Done.code(), 0);
        assert_eq!(Outcome::ExchangeError.code(), 1);
        assert_eq!(Outcome::Interrupted.code(), INTERRUPTED_EXIT_CODE);
    }

    #[test]
    fn monitor_prints_position() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![payload(100.0, 110.0, 105.0)], &interrupt);
        let target = MonitorTarget::new(2.0, 10.0, 5.0);
        let mut presenter = presenter();

        run(&client, &mut presenter, Some(&target), &once(), &interrupt).unwrap();

        let text = output(presenter);
        assert!(text.contains("BRL Current Payment: R$ 210,00\n"));
        assert!(text.contains("BRL Delta:           R$ 110,00 \u{2B08}\n"));
    }

    #[test]
    fn json_mode_prints_snapshots() {
        let interrupt = Interrupt::new();
        let client = ScriptedClient::new(vec![payload(100.0, 110.0, 105.0)], &interrupt);
        let options = SessionOptions {
            json: true,
            ..once()
        };
        let mut presenter = presenter();

        run(&client, &mut presenter, None, &options, &interrupt).unwrap();

        let value: Value = serde_json::from_str(output(presenter).trim()).unwrap();
        assert_eq!(value["quote"]["sell"], 110.0);
        assert_eq!(value["position"], Value::Null);
    }

    #[test]
    fn sleep_stops_on_interrupt() {
        let interrupt = Interrupt::new();
        interrupt.request();
        let started = Instant::now();

        assert!(!sleep_unless_interrupted(Duration::from_secs(30), &interrupt));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn sleep_completes_without_interrupt() {
        let interrupt = Interrupt::new();

        assert!(sleep_unless_interrupted(Duration::from_millis(5), &interrupt));
    }

    #[test]
    fn options_follow_poll_args() {
        let args = PollArgs {
            follow: true,
            sleep_interval: 15,
            json: false,
        };

        let options = SessionOptions::from(&args);

        assert!(options.follow);
        assert_eq!(options.interval, Duration::from_secs(15));
    }
}
