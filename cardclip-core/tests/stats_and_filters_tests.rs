use cardclip_core::{
    daily_streak, filter_by_tag, filter_by_text, summarize, Difficulty, Flashcard, Review,
};
use chrono::{Duration, Utc};

#[test]
fn filters_text_and_tag() {
    let mut c1 = Flashcard::new("hola", "hello");
    c1.tags = vec!["greeting".into(), "spanish".into()];
    let c2 = Flashcard::new("adios", "goodbye");

    let v = vec![c1.clone(), c2.clone()];

    let by_text = filter_by_text(&v, "hol");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].front, "hola");

    let by_tag = filter_by_tag(&v, "spanish");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].front, "hola");

    // Blank query matches everything.
    assert_eq!(filter_by_text(&v, "  ").len(), 2);
}

#[test]
fn stats_and_streak() {
    let card = Flashcard::new("hola", "hello");
    let now = Utc::now();

    let r0 = Review::new(card.id, Difficulty::Easy, now - Duration::days(2));
    let r1 = Review::new(card.id, Difficulty::Medium, now - Duration::days(1));
    let r2 = Review::new(card.id, Difficulty::Hard, now);

    let s = summarize(&[r0.clone(), r1.clone(), r2.clone()]);
    assert_eq!(s.totals.total, 3);
    assert_eq!(s.totals.easy, 1);
    assert_eq!(s.totals.medium, 1);
    assert_eq!(s.totals.hard, 1);
    assert!((s.totals.accuracy() - 2.0 / 3.0).abs() < f32::EPSILON);
    assert_eq!(s.per_day.len(), 3);

    let today = now.date_naive();
    assert_eq!(daily_streak(&[r0, r1, r2], today), 3);
    assert_eq!(daily_streak(&[], today), 0);
}
