//! Property-based tests for the dialogue engine.

use super::testing::{EchoAnswerer, RecordingSink};
use super::*;
use proptest::prelude::*;
use std::sync::Arc;

fn run<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

fn engine() -> DialogueEngine {
    DialogueEngine::new(
        Arc::new(EchoAnswerer::default()),
        Arc::new(RecordingSink::new(true)),
    )
}

fn arb_state() -> impl Strategy<Value = DialogueState> {
    prop::sample::select(DialogueState::ALL.to_vec())
}

/// Lowercase text with no slash prefix; may or may not contain a keyword.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z@. 0-9+]{0,30}"
}

/// Text that contains no handoff keyword and is not a command.
fn arb_plain_text() -> impl Strategy<Value = String> {
    arb_text().prop_filter("no keyword", |t| !contains_handoff_keyword(t))
}

/// Text with a keyword embedded somewhere, in random case.
fn arb_keyword_text() -> impl Strategy<Value = String> {
    (
        "[a-z ]{0,10}",
        prop::sample::select(HANDOFF_KEYWORDS.to_vec()),
        "[a-z ]{0,10}",
        any::<bool>(),
    )
        .prop_map(|(pre, kw, post, upper)| {
            let kw = if upper { kw.to_uppercase() } else { kw.to_string() };
            format!("{}{}{}", pre, kw, post)
        })
}

proptest! {
    #[test]
    fn keyword_in_free_chat_starts_handoff(text in arb_keyword_text()) {
        let (session, reply) = run(engine().handle(
            Some(Session::new(None)),
            &InboundEvent::new("c", None, text),
        ));
        prop_assert_eq!(session.state, DialogueState::CollectingName);
        prop_assert_eq!(reply.state, DialogueState::CollectingName);
    }

    #[test]
    fn plain_text_in_free_chat_is_answered(text in arb_plain_text()) {
        let (session, reply) = run(engine().handle(
            Some(Session::new(None)),
            &InboundEvent::new("c", None, text.clone()),
        ));
        prop_assert_eq!(session.state, DialogueState::Conversing);
        prop_assert_eq!(reply.text, format!("model says: {}", text));
    }

    #[test]
    fn fields_stay_ordered(inputs in prop::collection::vec(
        prop_oneof![
            arb_text(),
            Just("ana@example.com".to_string()),
            Just("+1 555 123 4567".to_string()),
            Just("/help".to_string()),
            Just("/cancel".to_string()),
        ],
        1..20,
    )) {
        let engine = engine();
        let mut session = None;
        for text in inputs {
            let (next, reply) = run(engine.handle(session, &InboundEvent::new("c", None, text)));
            prop_assert!(next.fields.is_in_order());
            prop_assert_eq!(reply.state, next.state);
            if next.state == DialogueState::Conversing {
                prop_assert!(next.fields.is_empty());
            }
            session = Some(next);
        }
    }

    #[test]
    fn cancel_always_returns_to_free_chat(state in arb_state(), name in "[A-Za-z]{1,10}") {
        let mut s = Session::new(Some(&name));
        s.state = state;
        if state.is_collecting() && state != DialogueState::CollectingName {
            s.fields.name = Some(name.clone());
        }
        let cancel = InboundEvent::new("c", None, "/cancel");
        let (session, reply) = run(engine().handle(Some(s), &cancel));
        prop_assert_eq!(session.state, DialogueState::Conversing);
        prop_assert!(session.fields.is_empty());
        prop_assert_eq!(reply.text, replies::CANCELLED);
    }
}
