use super::*;

#[test]
fn parses_forecast_with_literal_views() {
    let cli = Cli::try_parse_from(["cae", "forecast", "1200", "3400", "950"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Forecast {
            views,
            channel,
            confidence,
            kind,
            ..
        } => {
            assert_eq!(views, vec![1200.0, 3400.0, 950.0]);
            assert!(channel.is_none());
            assert!((confidence - 0.9).abs() < f64::EPSILON);
            assert_eq!(kind, IntervalKind::TwoSided);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn forecast_accepts_negative_views_for_validation_downstream() {
    let cli = Cli::try_parse_from(["cae", "forecast", "100", "-5"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Forecast { ref views, .. } if views == &[100.0, -5.0]
    ));
}

#[test]
fn parses_forecast_for_channel_with_kind_and_filters() {
    let cli = Cli::try_parse_from([
        "cae",
        "forecast",
        "--channel",
        "@mkbhd",
        "--kind",
        "lower",
        "--confidence",
        "0.95",
        "--months",
        "3",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Forecast {
            channel: Some(ref c),
            kind: IntervalKind::Lower,
            stats: StatsArgs { months: 3, max_results: 10, .. },
            ..
        } if c == "@mkbhd"
    ));
}

#[test]
fn forecast_rejects_unknown_kind() {
    let result = Cli::try_parse_from(["cae", "forecast", "1", "--kind", "sideways"]);
    assert!(result.is_err());
}

#[test]
fn forecast_needs_views_or_channel() {
    assert!(Cli::try_parse_from(["cae", "forecast"]).is_err());
    assert!(Cli::try_parse_from(["cae", "forecast", "1", "--channel", "x"]).is_err());
}

#[test]
fn parses_sentiment_texts() {
    let cli = Cli::try_parse_from(["cae", "sentiment", "Great video!", "Meh"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Sentiment { ref texts, video: None, max_comments: 100 } if texts.len() == 2
    ));
}

#[test]
fn parses_sentiment_for_video_comments() {
    let cli = Cli::try_parse_from(["cae", "sentiment", "--video", "dQw4w9WgXcQ"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Sentiment { ref texts, video: Some(ref v), .. }
            if texts.is_empty() && v == "dQw4w9WgXcQ"
    ));
}

#[test]
fn parses_thumbnail_with_default_on_error() {
    let cli = Cli::try_parse_from([
        "cae",
        "thumbnail",
        "--url",
        "https://i.ytimg.com/vi/x/hqdefault.jpg",
        "--default-on-error",
        "0.5",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Thumbnail { url: Some(_), video: None, default_on_error: Some(d) }
            if (d - 0.5).abs() < f32::EPSILON
    ));
}

#[test]
fn thumbnail_url_and_video_conflict() {
    let result = Cli::try_parse_from(["cae", "thumbnail", "--url", "u", "--video", "v"]);
    assert!(result.is_err());
}

#[test]
fn parses_stats_defaults() {
    let cli = Cli::try_parse_from(["cae", "stats", "UC_x5XG1OV2P6uZZ5FSM9Ttw"]).unwrap();
    match cli.command {
        Commands::Stats { channel, stats } => {
            assert_eq!(channel, "UC_x5XG1OV2P6uZZ5FSM9Ttw");
            assert_eq!(stats.max_results, 10);
            assert_eq!(stats.months, 6);
            assert!((stats.min_duration - 3.0).abs() < f64::EPSILON);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_channel_overview() {
    let cli = Cli::try_parse_from(["cae", "channel", "@mkbhd", "--max-videos", "25"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Channel { ref channel, max_videos: 25 } if channel == "@mkbhd"
    ));

    let cli = Cli::try_parse_from(["cae", "channel", "UC_x5XG1OV2P6uZZ5FSM9Ttw"]).unwrap();
    assert!(matches!(cli.command, Commands::Channel { max_videos: 10, .. }));
}

#[test]
fn parses_search_videos() {
    let cli = Cli::try_parse_from(["cae", "search-videos", "@mkbhd", "iphone review"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::SearchVideos { ref channel, ref query, max_results: 10 }
            if channel == "@mkbhd" && query == "iphone review"
    ));
}

#[test]
fn search_videos_needs_a_query() {
    assert!(Cli::try_parse_from(["cae", "search-videos", "@mkbhd"]).is_err());
}

#[test]
fn parses_analyze_and_report() {
    let cli = Cli::try_parse_from(["cae", "analyze", "abc123"]).unwrap();
    assert!(matches!(cli.command, Commands::Analyze { ref video_id } if video_id == "abc123"));

    let cli = Cli::try_parse_from(["cae", "report", "@chan", "--max-comments", "20"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Report { ref channel, max_comments: 20, .. } if channel == "@chan"
    ));
}

#[test]
fn no_cache_is_global() {
    let cli = Cli::try_parse_from(["cae", "comments", "abc", "--no-cache"]).unwrap();
    assert!(cli.no_cache);
    assert!(matches!(
        cli.command,
        Commands::Comments { max_results: 100, .. }
    ));
}

#[test]
fn parses_cache_subcommands() {
    let cli = Cli::try_parse_from(["cae", "cache", "prune"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Cache {
            command: CacheCommands::Prune
        }
    ));

    let cli = Cli::try_parse_from(["cae", "cache", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Cache {
            command: CacheCommands::Clear
        }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["cae"]).is_err());
}
