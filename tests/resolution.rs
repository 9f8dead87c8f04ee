//! Integration tests resolving signatures against realistic module snapshots.
//!
//! The bodies below are hand-assembled CIL, laid out the way the C# compiler emits the
//! corresponding members of a game client (`osu.GameModes.Play.Player` and friends).

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use opscope::{matcher::contains_run, prelude::*};

/// `Player.get_AllowDoubleSkip` as compiled, tokens shortened
const ALLOW_DOUBLE_SKIP: [u8; 39] = [
    0x7E, 0x01, 0x00, 0x00, 0x04, // ldsfld     int32 osu.AudioEngine::Time
    0x7E, 0x02, 0x00, 0x00, 0x04, // ldsfld     int32 osu.Player::SkipBoundary
    0x59, // sub
    0x65, // neg
    0x0A, // stloc.0
    0x02, // ldarg.0
    0x75, 0x03, 0x00, 0x00, 0x02, // isinst     osu.PlayerVs
    0x2D, 0x10, // brtrue.s   IL_0025
    0x7E, 0x04, 0x00, 0x00, 0x04, // ldsfld     osu.Ruleset osu.Player::currentRuleset
    0x06, // ldloc.0
    0x28, 0x05, 0x00, 0x00, 0x06, // call       bool osu.Ruleset::CanSkip(int32)
    0x2D, 0x03, // brtrue.s   IL_0025
    0x16, // ldc.i4.0
    0x2B, 0x01, // br.s       IL_0026
    0x17, // ldc.i4.1
    0x2A, // ret
];

/// A sibling getter sharing the first half of the code
const ALLOW_SINGLE_SKIP: [u8; 16] = [
    0x7E, 0x01, 0x00, 0x00, 0x04, // ldsfld
    0x65, // neg
    0x0A, // stloc.0
    0x02, // ldarg.0
    0x75, 0x03, 0x00, 0x00, 0x02, // isinst
    0x16, // ldc.i4.0
    0x2A, // ret
    0x00, // nop (padding)
];

fn allow_double_skip() -> Signature {
    Signature::new(&[
        Opcode::Neg,
        Opcode::Stloc0,
        Opcode::Ldarg0,
        Opcode::Isinst,
        Opcode::BrtrueS,
        Opcode::Ldsfld,
        Opcode::Ldloc0,
        Opcode::Call,
        Opcode::BrtrueS,
        Opcode::LdcI40,
        Opcode::BrS,
    ])
    .unwrap()
}

fn osu_module() -> ModuleIndex {
    ModuleIndex::builder("osu!")
        .add_type(
            TypeBuilder::new("osu", "AudioEngine")
                .constructor(0x1811, [0x16, 0x80, 0x01, 0x00, 0x00, 0x04, 0x2A])
                .method("get_Time", 0x0896, [0x7E, 0x01, 0x00, 0x00, 0x04, 0x2A]),
        )
        .add_type(
            TypeBuilder::new("osu.GameModes.Play", "Player")
                .constructor(
                    0x1886,
                    [
                        0x02, 0x28, 0x06, 0x00, 0x00, 0x06, 0x02, 0x17, 0x7D, 0x07, 0x00, 0x00,
                        0x04, 0x2A,
                    ],
                )
                .abstract_method("OnSkip", 0x05C4)
                .method("get_AllowSingleSkip", 0x0881, ALLOW_SINGLE_SKIP)
                .method("get_AllowDoubleSkip", 0x0881, ALLOW_DOUBLE_SKIP),
        )
        .build()
}

fn names<'a>(members: &[&'a MemberIdentity]) -> Vec<&'a str> {
    members.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn resolve_obfuscated_getter() {
    let module = Arc::new(osu_module());
    let matcher = SignatureMatcher::new(module);

    let member = matcher
        .resolve(&allow_double_skip(), MemberKind::Method)
        .unwrap();

    assert_eq!(member.name, "get_AllowDoubleSkip");
    assert_eq!(member.type_name, "osu.GameModes.Play.Player");
    assert_eq!(member.token, Token::method_def(6));
    assert_eq!(member.type_token, Token::type_def(3));
    assert!(!member.is_public());
    assert!(!member.is_static());
}

#[test]
fn signature_parsed_from_text_resolves_identically() {
    let matcher = SignatureMatcher::new(Arc::new(osu_module()));
    let text = "neg stloc.0 ldarg.0 isinst brtrue.s ldsfld ldloc.0 call brtrue.s ldc.i4.0 br.s";

    let parsed = Signature::parse(text).unwrap();
    assert_eq!(parsed, allow_double_skip());
    assert_eq!(
        matcher.resolve(&parsed, MemberKind::Method),
        matcher.resolve(&allow_double_skip(), MemberKind::Method)
    );
}

#[test]
fn shared_prefix_is_ambiguous_until_extended() {
    let matcher = SignatureMatcher::new(Arc::new(osu_module()));

    let short = Signature::parse("neg stloc.0 ldarg.0 isinst").unwrap();
    assert_eq!(
        names(&matcher.find_all(&short, MemberKind::Method)),
        ["get_AllowSingleSkip", "get_AllowDoubleSkip"]
    );
    assert_eq!(
        matcher.find(&short, MemberKind::Method).unwrap().name,
        "get_AllowSingleSkip"
    );

    let long = Signature::parse("neg stloc.0 ldarg.0 isinst brtrue.s").unwrap();
    assert_eq!(
        names(&matcher.find_all(&long, MemberKind::Method)),
        ["get_AllowDoubleSkip"]
    );
}

#[test]
fn constructors_and_methods_are_separate() {
    let matcher = SignatureMatcher::new(Arc::new(osu_module()));
    let signature = Signature::parse("ldarg.0 call").unwrap();

    let ctor = matcher.resolve(&signature, MemberKind::Constructor).unwrap();
    assert_eq!(ctor.name, ".ctor");
    assert_eq!(ctor.type_name, "osu.GameModes.Play.Player");

    assert!(matcher.resolve(&signature, MemberKind::Method).is_none());

    let cctor = matcher
        .resolve(&Signature::parse("ldc.i4.0 stsfld ret").unwrap(), MemberKind::Constructor)
        .unwrap();
    assert_eq!(cctor.name, ".cctor");
    assert!(cctor.is_static());
}

#[test]
fn three_methods_only_second_matches() {
    let [x, y, z] = [Opcode::Ldarg1, Opcode::Ldarg2, Opcode::Mul];
    let first: [u8; 4] = [0x02, 0x03, 0x58, 0x2A]; // ldarg.0 ldarg.1 add ret
    let second: [u8; 5] = [0x00, 0x03, 0x04, 0x5A, 0x2A]; // nop ldarg.1 ldarg.2 mul ret
    let third: [u8; 5] = [0x03, 0x04, 0x59, 0x5A, 0x2A]; // ldarg.1 ldarg.2 sub mul ret

    let module = ModuleIndex::builder("m")
        .add_type(
            TypeBuilder::new("n", "Calc")
                .method("First", 0x0006, first)
                .method("Second", 0x0006, second)
                .method("Third", 0x0006, third),
        )
        .build();

    let found = find_method(module.candidates(), &[x, y, z]).unwrap();
    assert_eq!(found.name, "Second");

    for (name, body) in [("First", &first[..]), ("Third", &third[..])] {
        let alone = ModuleIndex::builder("m")
            .add_type(TypeBuilder::new("n", "Calc").method(name, 0x0006, body))
            .build();
        assert!(find_method(alone.candidates(), &[x, y, z]).is_none());
    }
}

#[test]
fn empty_signature_never_matches() {
    let module = osu_module();
    assert!(find_method(module.candidates(), &[]).is_none());
    assert!(find_constructor(module.candidates(), &[]).is_none());
}

#[test]
fn overlapping_strategy_is_opt_in() {
    use Opcode::{Ldarg0 as A, Ldarg1 as B, Ldarg2 as C};

    // ldarg.0 ldarg.1 ldarg.0 ldarg.1 ldarg.0 ldarg.2 ret
    let body: [u8; 7] = [0x02, 0x03, 0x02, 0x03, 0x02, 0x04, 0x2A];
    let module = Arc::new(
        ModuleIndex::builder("m")
            .add_type(TypeBuilder::new("n", "T").method("Repeat", 0x0006, body))
            .build(),
    );
    let signature = Signature::new(&[A, B, A, C]).unwrap();

    let reset = SignatureMatcher::new(module.clone());
    assert!(reset.resolve(&signature, MemberKind::Method).is_none());

    let overlapping = SignatureMatcher::with_config(
        module,
        MatchConfig::new().strategy(MatchStrategy::Overlapping),
    );
    assert_eq!(
        overlapping
            .resolve(&signature, MemberKind::Method)
            .unwrap()
            .name,
        "Repeat"
    );

    assert!(!contains_run([A, A, A, B], &[A, A, B]));
    assert!(MatchStrategy::Overlapping.contains([A, A, A, B], &[A, A, B]));
}

#[test]
fn index_gives_identical_results() {
    let module = Arc::new(osu_module());
    let plain = SignatureMatcher::new(module.clone());
    let indexed = SignatureMatcher::with_config(module, MatchConfig::new().use_index(true));

    let signatures = [
        "neg stloc.0",
        "ldarg.0 call",
        "ldc.i4.0 stsfld",
        "ldsfld ret",
        "ldsfld ldsfld sub neg",
        "ceq",
    ];

    for text in signatures {
        let signature = Signature::parse(text).unwrap();
        for kind in [MemberKind::Method, MemberKind::Constructor] {
            assert_eq!(
                plain.find_all(&signature, kind),
                indexed.find_all(&signature, kind),
                "{text} ({kind})"
            );
        }
    }
}

/// Counts how often the module is actually scanned
struct CountingResolver {
    inner: SignatureMatcher,
    scans: AtomicUsize,
}

impl Resolver for CountingResolver {
    fn resolve(&self, signature: &Signature, kind: MemberKind) -> Option<MemberIdentity> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(signature, kind)
    }
}

#[test]
fn registry_scans_each_label_once() {
    let host = InMemoryHost::new()
        .with_module(ModuleIndex::builder("mscorlib").build())
        .with_module(osu_module());
    let locator = ModuleLocator::new("osu!");

    let resolver = CountingResolver {
        inner: SignatureMatcher::new(locator.module(&host).unwrap()),
        scans: AtomicUsize::new(0),
    };

    let registry = SignatureRegistry::builder()
        .method("Player#AllowDoubleSkip.get", allow_double_skip())
        .constructor(
            "Player#.ctor",
            Signature::parse("ldarg.0 call ldarg.0 ldc.i4.1 stfld").unwrap(),
        )
        .method("Player#Missing", Signature::parse("ldnull throw").unwrap())
        .build()
        .unwrap();

    let first = registry
        .require("Player#AllowDoubleSkip.get", &resolver)
        .unwrap();
    for _ in 0..10 {
        let again = registry
            .require("Player#AllowDoubleSkip.get", &resolver)
            .unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(resolver.scans.load(Ordering::SeqCst), 1);

    assert!(matches!(
        registry.require("Player#Missing", &resolver),
        Err(Error::SignatureNotFound { .. })
    ));
    assert!(registry.resolve("Player#Missing", &resolver).unwrap().is_none());
    assert_eq!(resolver.scans.load(Ordering::SeqCst), 2);

    assert_eq!(registry.resolve_all(&resolver), 2);
    assert_eq!(resolver.scans.load(Ordering::SeqCst), 3);
    assert_eq!(registry.absent(), ["Player#Missing"]);
    assert_eq!(
        registry.get("Player#.ctor").unwrap().state(),
        ResolutionState::Resolved
    );
}

#[test]
fn registry_shared_between_threads() {
    let resolver = CountingResolver {
        inner: SignatureMatcher::new(Arc::new(osu_module())),
        scans: AtomicUsize::new(0),
    };
    let registry = SignatureRegistry::builder()
        .method("Player#AllowDoubleSkip.get", allow_double_skip())
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let member = registry
                    .require("Player#AllowDoubleSkip.get", &resolver)
                    .unwrap();
                assert_eq!(member.name, "get_AllowDoubleSkip");
            });
        }
    });

    assert_eq!(resolver.scans.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_module_is_fatal() {
    let host = InMemoryHost::new().with_module(ModuleIndex::builder("osu!framework").build());

    match ModuleLocator::new("osu!").module(&host) {
        Err(Error::ModuleNotFound { name }) => assert_eq!(name, "osu!"),
        other => panic!("unexpected result: {other:?}"),
    }
}
