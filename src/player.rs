//! Async playback driver for native hosts.
//!
//! Awaits each step's delay on the tokio timer instead of blocking a
//! thread. The sequencer stays on the calling task, so sinks that are not
//! `Send` (such as a cpal stream) work on a current-thread runtime.

use std::future::Future;

use crate::error::MorseError;
use crate::sequencer::{FinishReason, Sequencer, Step, ToneSink};

/// Play `encoded` to the end, or until `cancel` resolves.
///
/// Returns `Ok(None)` when there was nothing to play. On cancellation the
/// sequencer is stopped, which silences any tone in flight.
pub async fn play<S, C>(
    sequencer: &mut Sequencer<S>,
    encoded: &str,
    cancel: C,
) -> Result<Option<FinishReason>, MorseError>
where
    S: ToneSink,
    C: Future<Output = ()>,
{
    if sequencer.start(encoded)?.is_none() {
        return Ok(None);
    }
    tokio::pin!(cancel);

    loop {
        match sequencer.advance()? {
            Step::Wait(delay) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = &mut cancel => {
                        log::debug!("playback cancelled");
                        sequencer.stop();
                        return Ok(Some(FinishReason::Stopped));
                    }
                }
            }
            Step::Done => return Ok(Some(FinishReason::Completed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::{PlaybackConfig, PlaybackEvent};
    use crate::timeline::{RecordingSink, Timeline};
    use std::cell::RefCell;
    use std::future::pending;
    use std::rc::Rc;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};

    fn sequencer() -> (Sequencer<RecordingSink>, Rc<RefCell<Vec<PlaybackEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut seq = Sequencer::new(RecordingSink::default(), PlaybackConfig::default());
        let seen = Rc::clone(&events);
        seq.subscribe(move |e: PlaybackEvent| seen.borrow_mut().push(e));
        (seq, events)
    }

    #[tokio::test(start_paused = true)]
    async fn three_dots_take_six_units() {
        let (mut seq, _) = sequencer();
        let begin = Instant::now();
        let result = play(&mut seq, "...", pending()).await.unwrap();
        assert_eq!(result, Some(FinishReason::Completed));
        assert_eq!(begin.elapsed(), Duration::from_millis(480));
    }

    #[tokio::test(start_paused = true)]
    async fn matches_timeline_total() {
        let morse = crate::codec::encode("CQ DX");
        let expected = Timeline::from_morse(&morse, &PlaybackConfig::default()).total;
        let (mut seq, _) = sequencer();
        let begin = Instant::now();
        play(&mut seq, &morse, pending()).await.unwrap();
        assert_eq!(begin.elapsed(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_once() {
        let (mut seq, events) = sequencer();
        let result = play(&mut seq, "--- ---", sleep(Duration::from_millis(100)))
            .await
            .unwrap();
        assert_eq!(result, Some(FinishReason::Stopped));
        assert!(!seq.is_active());
        assert!(!seq.sink().is_sounding());
        assert_eq!(
            *events.borrow(),
            vec![
                PlaybackEvent::Started,
                PlaybackEvent::Underway,
                PlaybackEvent::Finished {
                    reason: FinishReason::Stopped
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_returns_immediately() {
        let (mut seq, events) = sequencer();
        assert_eq!(play(&mut seq, "", pending()).await.unwrap(), None);
        assert!(events.borrow().is_empty());
    }
}
