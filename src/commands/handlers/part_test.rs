use super::join::handle_join;
use super::part::handle_part;
use super::test_support::*;

#[test]
fn test_part_notifies_and_confirms() {
    let state = setup_test_state();
    let (alice, _alice_rx) = register(&state, "alice");
    let (bob, mut bob_rx) = register(&state, "bob");
    handle_join(&state, &alice, vec!["#lobby".to_string()]);
    handle_join(&state, &bob, vec!["#lobby".to_string()]);

    let reason = Some("see you".to_string());
    let responses = handle_part(&state, &alice, vec!["#lobby".to_string()], reason);

    assert_eq!(wire(&responses), vec![":alice!alice@127.0.0.1 PART #lobby :see you"]);
    assert_eq!(drain(&mut bob_rx), vec![":alice!alice@127.0.0.1 PART #lobby :see you"]);
    assert_eq!(state.registry.channel_members("#lobby"), Some(vec!["bob".to_string()]));
}

#[test]
fn test_last_part_deletes_channel() {
    let state = setup_test_state();
    let (alice, _rx) = register(&state, "alice");
    handle_join(&state, &alice, vec!["#lobby".to_string()]);

    handle_part(&state, &alice, vec!["#lobby".to_string()], None);

    assert_eq!(state.registry.channel_count(), 0);
}

#[test]
fn test_part_errors() {
    let state = setup_test_state();
    let (alice, _a) = register(&state, "alice");
    let (bob, _b) = register(&state, "bob");
    handle_join(&state, &alice, vec!["#lobby".to_string()]);

    let channels = vec!["#lobby".to_string(), "#void".to_string()];
    let responses = handle_part(&state, &bob, channels, None);

    assert_eq!(
        wire(&responses),
        vec![
            ":irc.local 442 bob #lobby :You're not on that channel",
            ":irc.local ERROR :You are not in channel #lobby",
            ":irc.local 403 bob #void :No such channel",
            ":irc.local ERROR :Channel #void not found",
        ]
    );
}
