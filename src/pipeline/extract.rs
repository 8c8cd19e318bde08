use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;

use crate::error::AgentError;

/// Isolates the first fenced code block embedded in a streamed response.
///
/// Two-state automaton: while seeking, deltas accumulate in a buffer until
/// the opening fence (three or more backticks, optional language tag, one
/// newline) is visible as a whole, since the fence tokens may be split
/// arbitrarily across delta boundaries. Inside the block a single-character
/// scan suffices: the first backtick marks the closing fence and ends the
/// stream for good. At most one block is extracted per response.
pub struct CodeBlockExtractor<S> {
    deltas: S,
    state: FenceState,
}

enum FenceState {
    Seeking {
        accumulator: String,
        // resume offset for the fence search, so long preambles are not
        // rescanned from the start on every delta
        scan_from: usize,
        fence_at: Option<usize>,
    },
    Inside,
    Done,
}

impl<S> CodeBlockExtractor<S> {
    pub fn new(deltas: S) -> Self {
        Self {
            deltas,
            state: FenceState::Seeking {
                accumulator: String::new(),
                scan_from: 0,
                fence_at: None,
            },
        }
    }
}

impl<S> Stream for CodeBlockExtractor<S>
where
    S: Stream<Item = Result<String, AgentError>> + Unpin,
{
    type Item = Result<String, AgentError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if matches!(this.state, FenceState::Done) {
                return Poll::Ready(None);
            }
            let Some(delta) = ready!(Pin::new(&mut this.deltas).poll_next(cx)) else {
                this.state = FenceState::Done;
                return Poll::Ready(None);
            };
            let delta = match delta {
                Ok(delta) => delta,
                Err(err) => {
                    this.state = FenceState::Done;
                    return Poll::Ready(Some(Err(err)));
                }
            };
            match &mut this.state {
                FenceState::Seeking {
                    accumulator,
                    scan_from,
                    fence_at,
                } => {
                    accumulator.push_str(&delta);
                    if fence_at.is_none() {
                        if let Some(pos) = accumulator[*scan_from..].find("```") {
                            *fence_at = Some(*scan_from + pos);
                        } else {
                            // a partial fence may straddle the delta boundary;
                            // back off to a char boundary so slicing stays valid
                            let mut resume = accumulator.len().saturating_sub(2);
                            while !accumulator.is_char_boundary(resume) {
                                resume -= 1;
                            }
                            *scan_from = resume;
                        }
                    }
                    let Some(start) = *fence_at else { continue };
                    let rest = accumulator[start + 3..].trim_start_matches('`');
                    let Some(newline) = rest.find('\n') else {
                        continue;
                    };
                    let body = rest[newline + 1..].to_string();
                    // the first chunk may already contain the closing fence
                    // when the whole block fits in one delta
                    if let Some(idx) = body.find('`') {
                        let prefix = body[..idx].to_string();
                        this.state = FenceState::Done;
                        if prefix.is_empty() {
                            return Poll::Ready(None);
                        }
                        return Poll::Ready(Some(Ok(prefix)));
                    }
                    this.state = FenceState::Inside;
                    if !body.is_empty() {
                        return Poll::Ready(Some(Ok(body)));
                    }
                }
                FenceState::Inside => {
                    if let Some(idx) = delta.find('`') {
                        let prefix = delta[..idx].to_string();
                        this.state = FenceState::Done;
                        if prefix.is_empty() {
                            return Poll::Ready(None);
                        }
                        return Poll::Ready(Some(Ok(prefix)));
                    }
                    return Poll::Ready(Some(Ok(delta)));
                }
                FenceState::Done => unreachable!("checked at loop head"),
            }
        }
    }
}
