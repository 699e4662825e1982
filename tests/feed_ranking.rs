use ecocampus::domain::date::{parse_article_date, spanish_month_index, ArticleTimestamp, SPANISH_MONTHS};
use ecocampus::domain::{Article, ArticleId};
use ecocampus::feed::{rank, Rankable};

fn article(id: i64, is_new: bool, featured: bool, date: &str) -> Article {
    let mut article = Article::new(ArticleId::Number(id), format!("Artículo {id}"), "Reciclaje");
    article.is_new = is_new;
    article.featured = featured;
    article.date = date.to_string();
    article
}

fn sample() -> Vec<Article> {
    vec![
        article(1, false, true, "01 ENE 2024"),
        article(2, true, false, "01 ENE 2020"),
        article(3, false, false, "01 ENE 2025"),
        article(4, true, true, "2023-06-15"),
        article(5, false, false, "sin fecha"),
        article(6, false, true, "15 jun 2023"),
        article(7, true, false, "31 DIC 2019"),
        article(8, false, false, "2024-02-30"),
    ]
}

#[test]
fn spanish_dates_match_calendar_construction() {
    for (month0, abbreviation) in SPANISH_MONTHS.iter().enumerate() {
        let month0 = u32::try_from(month0).unwrap();
        for (day, year) in [(1, 2020), (15, 2024), (28, 1999)] {
            let expected = ArticleTimestamp::from_calendar(year, month0, day).unwrap();
            let upper = format!("{day:02} {abbreviation} {year}");
            let lower = format!("{day} {} {year}", abbreviation.to_lowercase());
            assert_eq!(parse_article_date(&upper), expected, "{upper}");
            assert_eq!(parse_article_date(&lower), expected, "{lower}");
        }
        assert_eq!(spanish_month_index(abbreviation), Some(month0));
    }
}

#[test]
fn malformed_dates_are_oldest() {
    for raw in ["", "   ", "01 ENE", "01 ENE 2024 extra", "xx ENE 2024", "01 FOO 2024", "01 ENE 20x4", "2024-13-45"] {
        assert_eq!(parse_article_date(raw), ArticleTimestamp::oldest(), "{raw:?}");
    }
}

#[test]
fn ranking_is_a_permutation() {
    let input = sample();
    let ranked = rank(&input);
    assert_eq!(ranked.len(), input.len());

    let mut input_ids: Vec<String> = input.iter().map(|a| a.id.to_string()).collect();
    let mut ranked_ids: Vec<String> = ranked.iter().map(|a| a.id.to_string()).collect();
    input_ids.sort();
    ranked_ids.sort();
    assert_eq!(input_ids, ranked_ids);
}

#[test]
fn ranked_pairs_respect_priority() {
    let ranked = rank(&sample());
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let ordered = a.is_new() > b.is_new()
            || (a.is_new() == b.is_new() && a.is_featured() > b.is_featured())
            || (a.is_new() == b.is_new()
                && a.is_featured() == b.is_featured()
                && parse_article_date(&a.date) >= parse_article_date(&b.date));
        assert!(ordered, "{} before {}", a.id, b.id);
    }
}

#[test]
fn ranking_is_idempotent() {
    let once = rank(&sample());
    let twice = rank(&once);
    assert_eq!(once, twice);
}

#[test]
fn three_article_scenario() {
    let input = vec![
        article(1, false, true, "01 ENE 2024"),
        article(2, true, false, "01 ENE 2020"),
        article(3, false, false, "01 ENE 2025"),
    ];
    let ids: Vec<String> = rank(&input).iter().map(|a| a.id.to_string()).collect();
    assert_eq!(ids, vec!["2", "1", "3"]);
}
