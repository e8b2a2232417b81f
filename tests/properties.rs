//! Property tests for the profile mutator and the OTP gate.

use proptest::prelude::*;

use therapy_companion::domain::otp::{EntryOutcome, OtpGate, OtpState, OTP_LENGTH};
use therapy_companion::domain::profile::{Identity, ProfilePatch, ProfileType, UserProfile};

fn profile_type() -> impl Strategy<Value = ProfileType> {
    prop_oneof![
        Just(ProfileType::Athlete),
        Just(ProfileType::Coach),
        Just(ProfileType::Health),
    ]
}

fn tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z-]{1,12}", 0..5)
}

/// One patch per onboarding screen; each touches a disjoint set of fields
/// and starts from an empty profile, so no derived field is reset.
fn screen_patches() -> impl Strategy<Value = Vec<ProfilePatch>> {
    (
        ("[A-Za-z ]{1,20}", "[a-z]{1,8}@x\\.com", "\\+1[0-9]{10}"),
        profile_type(),
        "[a-z0-9-]{1,12}",
        proptest::option::of("[a-z-]{1,12}"),
        tags(),
        any::<bool>(),
    )
        .prop_map(|((name, email, phone), pt, level, goal, interests, otp)| {
            let mut details = ProfilePatch::new().with_level(level);
            if let Some(goal) = goal {
                details = details.with_goal(goal);
            }
            vec![
                ProfilePatch::new().with_identity(Identity::new(name, email, phone)),
                ProfilePatch::new().with_otp_verified(otp),
                ProfilePatch::new().with_profile_type(pt),
                details,
                ProfilePatch::new().with_interests(interests),
            ]
        })
}

proptest! {
    #[test]
    fn prop_screen_patches_commute(
        patches in screen_patches(),
        order in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let in_order = patches
            .iter()
            .cloned()
            .fold(UserProfile::empty(), UserProfile::merged);
        let shuffled = order
            .iter()
            .map(|i| patches[*i].clone())
            .fold(UserProfile::empty(), UserProfile::merged);
        prop_assert_eq!(in_order, shuffled);
    }

    #[test]
    fn prop_switching_profile_type_resets_details(
        (from, to) in (profile_type(), profile_type()).prop_filter("distinct types", |(a, b)| a != b),
        level in "[a-z0-9-]{1,12}",
        goal in "[a-z-]{1,12}",
    ) {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_profile_type(from).with_level(level).with_goal(goal))
            .merged(ProfilePatch::new().with_profile_type(to));
        prop_assert_eq!(profile.profile_type(), Some(to));
        prop_assert_eq!(profile.level(), "");
        prop_assert_eq!(profile.goal(), None);
    }

    #[test]
    fn prop_interests_are_replaced_by_last_patch(lists in prop::collection::vec(tags(), 1..6)) {
        let last = lists.last().cloned().unwrap_or_default();
        let profile = lists
            .into_iter()
            .map(|l| ProfilePatch::new().with_interests(l))
            .fold(UserProfile::empty(), UserProfile::merged);
        prop_assert_eq!(profile.interests(), last.as_slice());
    }

    #[test]
    fn prop_otp_submits_exactly_when_all_slots_filled(
        keys in prop::collection::vec((0..OTP_LENGTH, 0u8..10), 1..24),
    ) {
        let mut gate = OtpGate::default();
        for (slot, digit) in keys {
            let ch = char::from(b'0' + digit);
            let outcome = gate.enter(slot, ch).unwrap();
            if outcome == EntryOutcome::Locked {
                prop_assert_eq!(gate.state(), OtpState::SubmitPending);
                continue;
            }
            let submitted = matches!(outcome, EntryOutcome::Submit(_));
            prop_assert_eq!(submitted, gate.filled_count() == OTP_LENGTH);
            if !submitted {
                prop_assert_eq!(gate.state(), OtpState::AwaitingInput);
            }
        }
    }

    #[test]
    fn prop_non_digits_never_change_slots(slot in 0..OTP_LENGTH, ch in any::<char>()) {
        prop_assume!(!ch.is_ascii_digit());
        let mut gate = OtpGate::default();
        let before = gate.clone();
        prop_assert!(gate.enter(slot, ch).is_err());
        prop_assert_eq!(gate, before);
    }
}
