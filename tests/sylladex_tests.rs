//! Sylladex and shell integration tests.
//!
//! These tests run whole sessions: capture, save, switch and load, both
//! through the `Sylladex` API and through shell command lines.

use sylladex::core::Card;
use sylladex::modus::{FolderTag, Route};
use sylladex::shell::Shell;
use sylladex::{
    ActiveModus, LoadMode, LoadStatus, ModusError, ModusKind, RecordStore, Sylladex,
    SylladexConfig,
};
use tempfile::TempDir;

fn session(kind: ModusKind) -> (TempDir, Sylladex) {
    let dir = tempfile::tempdir().unwrap();
    let config = SylladexConfig::new()
        .with_store(dir.path().join("inventory.MSF"))
        .with_seed(42)
        .with_modus(kind);
    (dir, Sylladex::new(config).unwrap())
}

// =============================================================================
// Save / Load
// =============================================================================

/// Loading before anything was saved starts empty.
#[test]
fn test_first_load_is_empty() {
    let (_dir, mut syl) = session(ModusKind::PentaFile);
    let outcome = syl.load(LoadMode::AsIs).unwrap();
    assert_eq!(outcome.value, LoadStatus::StoreMissing);
    assert!(syl.modus().is_empty());
}

/// Save then load restores folder placement.
#[test]
fn test_save_load_penta() {
    let (_dir, mut syl) = session(ModusKind::PentaFile);
    syl.capture_into("Gem", FolderTag::Survival).unwrap();
    syl.capture("Wand").unwrap();
    syl.save().unwrap();

    syl.eject_all();
    assert!(syl.modus().is_empty());

    let outcome = syl.load(LoadMode::AsIs).unwrap();
    assert_eq!(outcome.value, LoadStatus::Complete);
    let ActiveModus::Penta(penta) = syl.active() else {
        panic!("expected the folder modus");
    };
    assert_eq!(penta.folder(FolderTag::Survival).get(0).unwrap().name(), "Gem");
    assert_eq!(penta.folder(FolderTag::Weapons).get(0).unwrap().name(), "Wand");
}

/// A deck saved to disk loads into folders with the fast mode.
#[test]
fn test_deck_file_into_folders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.MSF");

    let config = SylladexConfig::new().with_store(&path).with_modus(ModusKind::TarotDeck);
    let mut deck = Sylladex::new(config.clone().with_seed(1)).unwrap();
    for name in ["C", "B", "A"] {
        deck.capture(name).unwrap();
    }
    deck.save().unwrap();

    let mut penta = Sylladex::new(config.with_modus(ModusKind::PentaFile).with_seed(1)).unwrap();
    penta.load(LoadMode::Fast).unwrap();
    let ActiveModus::Penta(folders) = penta.active() else {
        panic!("expected the folder modus");
    };
    let weapons: Vec<_> = folders.folder(FolderTag::Weapons).iter().map(Card::name).collect();
    assert_eq!(weapons, ["A", "B", "C", "EMPTY", "EMPTY"]);
}

/// Manual load routes each saved card.
#[test]
fn test_manual_load() {
    let (_dir, mut syl) = session(ModusKind::PentaFile);
    syl.capture("Wand").unwrap();
    syl.capture("Gem").unwrap();
    syl.save().unwrap();

    syl.load_manual(|card| {
        if card.name() == "Gem" {
            Route::Folder(FolderTag::KeyCritical)
        } else {
            Route::Skip
        }
    })
    .unwrap();

    assert_eq!(syl.modus().card_count(), 1);
    let ActiveModus::Penta(penta) = syl.active() else {
        panic!("expected the folder modus");
    };
    assert_eq!(penta.folder(FolderTag::KeyCritical).get(0).unwrap().name(), "Gem");
}

/// Save failures come back as errors and leave the session usable.
#[test]
fn test_save_failure_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = SylladexConfig::new()
        .with_store(dir.path().join("gone").join("inventory.MSF"))
        .with_seed(1);
    let mut syl = Sylladex::new(config).unwrap();
    syl.capture("Wand").unwrap();

    assert!(matches!(syl.save(), Err(ModusError::StoreUnavailable { .. })));
    assert_eq!(syl.modus().card_count(), 1);
}

/// A loaded card keeps its stored code through take-out and pickup.
#[test]
fn test_pickup_keeps_loaded_code() {
    let (_dir, mut syl) = session(ModusKind::TarotDeck);
    let store = RecordStore::new(&syl.config().store_path);
    store.save(&[Card::from_parts("Gem", "ABC1234", true).unwrap()]).unwrap();
    syl.load(LoadMode::AsIs).unwrap();

    let drawn = syl.draw().unwrap();
    assert_eq!(drawn.value.code(), "ABC1234");

    let outcome = syl.pick_up_hand();
    assert!(outcome.is_done());
    assert!(syl.hand().is_empty());

    let redrawn = syl.draw().unwrap();
    assert_eq!(redrawn.value, drawn.value);
    assert_eq!(redrawn.value.code(), "ABC1234");
}

/// Picking up into folders also keeps codes.
#[test]
fn test_pickup_into_folders_keeps_code() {
    let (_dir, mut syl) = session(ModusKind::PentaFile);
    let store = RecordStore::new(&syl.config().store_path);
    store.save(&[Card::from_parts("Wand", "ZZZ0001", true).unwrap()]).unwrap();
    syl.load(LoadMode::AsIs).unwrap();

    syl.take_out_by_name("Wand");
    syl.pick_up_hand();

    let ActiveModus::Penta(penta) = syl.active() else {
        panic!("expected the folder modus");
    };
    assert_eq!(penta.folder(FolderTag::Weapons).get(0).unwrap().code(), "ZZZ0001");
}

// =============================================================================
// Switching
// =============================================================================

/// Cards survive a tour through every modus.
#[test]
fn test_switch_through_all_modi() {
    let (_dir, mut syl) = session(ModusKind::PentaFile);
    for name in ["Wand", "Blade", "Gem", "Incense"] {
        syl.capture(name).unwrap();
    }

    syl.switch_modus(ModusKind::TarotDeck, LoadMode::NonEmpty);
    assert_eq!(syl.modus().card_count(), 4);

    syl.switch_modus(ModusKind::BalancedTree, LoadMode::NonEmpty);
    assert_eq!(syl.modus().card_count(), 4);

    syl.switch_modus(ModusKind::PentaFile, LoadMode::Fast);
    assert_eq!(syl.modus().card_count(), 4);
    assert!(syl.hand().is_empty());
}

/// A deck too big for the folders spills the rest into the hand.
#[test]
fn test_switch_overflow_to_hand() {
    let (_dir, mut syl) = session(ModusKind::TarotDeck);
    for i in 0..30 {
        syl.capture(&format!("item{i:02}")).unwrap();
    }

    syl.switch_modus(ModusKind::PentaFile, LoadMode::Fast);
    assert!(syl.modus().is_full());
    assert_eq!(syl.hand().len(), 5);
}

// =============================================================================
// Shell
// =============================================================================

/// A scripted shell session.
#[test]
fn test_shell_session() {
    let (_dir, syl) = session(ModusKind::PentaFile);
    let mut shell = Shell::new(syl);
    let mut router = |_: &Card| Route::Skip;

    for line in [
        "capture Wand, w",
        "capture Blade, w",
        "capture Marbles, w",
        "capture Dmnd Staff, w",
        "capture SynOrb, w",
    ] {
        shell.execute(line, &mut router).unwrap();
    }

    let reply = shell.execute("capture LotusBlade, w", &mut router).unwrap();
    assert!(reply.text.contains("ejected: Wand, Blade, Marbles, Dmnd Staff, SynOrb"));
    assert_eq!(shell.sylladex().hand().len(), 5);

    shell.execute("save", &mut router).unwrap();
    shell.execute("switch deck", &mut router).unwrap();
    assert_eq!(shell.sylladex().kind(), ModusKind::TarotDeck);

    let reply = shell.execute("draw", &mut router).unwrap();
    assert!(reply.text.contains("LotusBlade"));

    shell.execute("switch penta", &mut router).unwrap();
    let reply = shell.execute("load as-is", &mut router).unwrap();
    assert!(!reply.text.contains("corrupt"));
    assert_eq!(shell.sylladex().modus().card_count(), 1);

    assert!(shell.execute("quit", &mut router).unwrap().quit);
}

/// Bad input is an error, not a panic, and the session continues.
#[test]
fn test_shell_rejects_bad_input() {
    let (_dir, syl) = session(ModusKind::PentaFile);
    let mut shell = Shell::new(syl);
    let mut router = |_: &Card| Route::Skip;

    assert!(matches!(
        shell.execute("capture Caledfwlch Sword", &mut router),
        Err(ModusError::NameTooLong { .. })
    ));
    assert!(shell.execute("take 99", &mut router).unwrap().text.contains("out of range"));
    assert!(shell.execute("juggle", &mut router).is_err());
    assert!(shell.sylladex().modus().is_empty());
}
