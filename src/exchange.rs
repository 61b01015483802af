use anyhow::Result;
use std::time::{Duration, Instant};

use crate::link::Link;
use crate::payload::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Mismatch,
    Timeout,
}

/// What one trial resolved to. Folded into the run counters and
/// discarded at the end of the loop pass.
#[derive(Debug)]
pub struct TrialResult {
    pub outcome: Outcome,
    pub received: Vec<u8>,
    pub elapsed: Duration,
}

/// One send-then-await-echo exchange: write the whole payload, then poll
/// the link on a fixed interval, draining available bytes until the
/// payload's completion rule fires or the timeout expires.
pub fn run_trial(
    link: &mut dyn Link,
    payload: &Payload,
    timeout: Duration,
    poll: Duration,
) -> Result<TrialResult> {
    link.send(payload.as_bytes())?;
    let sent_at = Instant::now();
    let mut rx: Vec<u8> = Vec::with_capacity(payload.len());

    loop {
        if link.bytes_available()? > 0 {
            link.read_available(&mut rx)?;
            if payload.is_complete(&rx) {
                let outcome = if payload.matches(&rx) {
                    Outcome::Ok
                } else {
                    Outcome::Mismatch
                };
                return Ok(TrialResult {
                    outcome,
                    received: rx,
                    elapsed: sent_at.elapsed(),
                });
            }
        }

        let elapsed = sent_at.elapsed();
        if elapsed > timeout {
            // partial accumulator is reported, not awaited further
            return Ok(TrialResult {
                outcome: Outcome::Timeout,
                received: rx,
                elapsed,
            });
        }

        std::thread::sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::sim::SimLink;
    use crate::link::LinkError;

    const TIMEOUT: Duration = Duration::from_millis(40);
    const POLL: Duration = Duration::from_millis(1);

    #[test]
    fn echoed_pattern_resolves_ok() {
        let mut link = SimLink::echo();
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Ok);
        assert_eq!(res.received, payload.as_bytes());
        assert_eq!(link.sent, vec![payload.as_bytes().to_vec()]);
    }

    #[test]
    fn echoed_text_resolves_ok() {
        let mut link = SimLink::echo();
        let payload = Payload::random_text(30);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Ok);
    }

    #[test]
    fn corrupted_last_byte_is_mismatch() {
        let mut link = SimLink::new(|buf| {
            let mut echoed = buf.to_vec();
            *echoed.last_mut().unwrap() = 255;
            vec![echoed]
        });
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Mismatch);
        assert_eq!(res.received[9], 255);
    }

    #[test]
    fn corrupted_text_is_mismatch() {
        let mut link = SimLink::new(|buf| {
            let mut echoed = buf.to_vec();
            echoed[0] = echoed[0].wrapping_add(1);
            vec![echoed]
        });
        let payload = Payload::random_text(8);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Mismatch);
    }

    #[test]
    fn silent_link_times_out_after_threshold() {
        let mut link = SimLink::silent();
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Timeout);
        assert!(res.received.is_empty());
        assert!(res.elapsed >= TIMEOUT);
        // resolution lags the threshold by at most one polling tick
        // (plus scheduler slack)
        assert!(res.elapsed <= TIMEOUT + POLL + Duration::from_millis(20));
    }

    #[test]
    fn partial_delivery_across_polls_resolves_ok() {
        let mut link = SimLink::new(|buf| {
            let mid = buf.len() / 2;
            vec![buf[..mid].to_vec(), buf[mid..].to_vec()]
        });
        let payload = Payload::pattern(100, 20);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Ok);
        assert_eq!(res.received, payload.as_bytes());
    }

    #[test]
    fn trailing_extras_after_correct_raw_echo_still_ok() {
        let mut link = SimLink::new(|buf| {
            let mut echoed = buf.to_vec();
            echoed.push(0xEE);
            vec![echoed]
        });
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Ok);
    }

    struct CountingLink {
        inner: SimLink,
        avail_calls: u32,
    }

    impl Link for CountingLink {
        fn send(&mut self, buf: &[u8]) -> Result<(), LinkError> {
            self.inner.send(buf)
        }
        fn bytes_available(&mut self) -> Result<usize, LinkError> {
            self.avail_calls += 1;
            self.inner.bytes_available()
        }
        fn read_available(&mut self, out: &mut Vec<u8>) -> Result<usize, LinkError> {
            self.inner.read_available(out)
        }
    }

    #[test]
    fn one_availability_query_per_polling_tick() {
        let mut link = CountingLink {
            inner: SimLink::echo(),
            avail_calls: 0,
        };
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Ok);
        assert_eq!(link.avail_calls, 1);
    }

    #[test]
    fn partial_echo_then_silence_times_out_with_partial_kept() {
        let mut link = SimLink::new(|buf| vec![buf[..3].to_vec()]);
        let payload = Payload::pattern(0, 10);
        let res = run_trial(&mut link, &payload, TIMEOUT, POLL).unwrap();
        assert_eq!(res.outcome, Outcome::Timeout);
        assert_eq!(res.received, &[0, 1, 2]);
    }
}
