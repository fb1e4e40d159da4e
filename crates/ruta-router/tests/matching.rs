//! Tests for path segmentation and route matching.

mod common;
use common::*;

use ruta_router::{match_path, path_segments};

#[test]
fn segments_collapse_repeated_slashes() {
    assert_eq!(path_segments("//a///b/"), path_segments("/a/b"));
    assert_eq!(path_segments("//reg/1234//exp/"), vec!["reg", "1234", "exp"]);
}

#[test]
fn segments_of_empty_paths() {
    assert!(path_segments("").is_empty());
    assert!(path_segments("/").is_empty());
}

#[test]
fn segments_keep_unicode_and_spaces() {
    assert_eq!(
        path_segments("/ábc/dñefgh/12.html"),
        vec!["ábc", "dñefgh", "12.html"]
    );
    assert_eq!(path_segments("/abc/def ghi/"), vec!["abc", "def ghi"]);
}

#[test]
fn empty_request_path_never_matches() {
    let m = match_route("/abc/4567/def/", "");
    assert!(!m.matched);
    assert!(m.args.is_empty());
}

#[test]
fn empty_pattern_never_matches() {
    assert!(!match_route("/", "/abc").matched);
    assert!(!match_route("", "/abc").matched);
}

#[test]
fn literal_route_matches_exactly() {
    let m = match_route("/abc/4567/def/", "/abc/4567/def/");
    assert!(m.matched);
    assert!(m.args.is_empty());

    assert!(match_route("/abc/4567/def", "///abc//4567/def").matched);
    assert!(!match_route("/abc/4567/def", "/abc/4567").matched);
    assert!(!match_route("/abc/4567/def", "/abc/4567/DEF").matched);
}

#[test]
fn literal_route_rejects_longer_paths() {
    assert!(!match_route("/a/b", "/a/b/c").matched);
}

#[test]
fn placeholder_route_captures() {
    let m = match_route("/abc/{id}/def/", "/abc/7890/def/");
    assert!(m.matched);
    assert_eq!(args_of(&m), vec![("id", "7890")]);
}

#[test]
fn placeholder_captures_in_segment_order() {
    let m = match_route("/posts/{post}/comments/{comment}", "/posts/42/comments/7");
    assert!(m.matched);
    assert_eq!(args_of(&m), vec![("post", "42"), ("comment", "7")]);
}

#[test]
fn malformed_placeholder_never_matches() {
    for pattern in ["/abc/{id/def/", "/abc/id}/def/", "/abc/{}/def/"] {
        let m = match_route(pattern, "/abc/abcd/def/");
        assert!(!m.matched, "{pattern} should not match");
        assert!(m.args.is_empty());
    }
}

#[test]
fn regex_route_captures() {
    let m = match_route("/abc/regex(key=^[A-Z]+$)/def", "/abc/XYZ/def");
    assert!(m.matched);
    assert_eq!(args_of(&m), vec![("key", "XYZ")]);

    let m = match_route("/abc/regex(key=^([A-Z]+)$)/def/", "/abc/XYZ/def/");
    assert_eq!(args_of(&m), vec![("key", "XYZ")]);
}

#[test]
fn regex_route_rejects_non_matching_segment() {
    let m = match_route("/abc/regex(key=^[A-Z]+$)/def/", "/abc/xyz/def/");
    assert!(!m.matched);
    assert!(m.args.is_empty());
}

#[test]
fn malformed_regex_never_matches() {
    for pattern in [
        "/abc/regex(key^[0-9]+$)/def/",
        "/abc/regexkey^[0-9]+$)/def/",
        "/abc/regex(key^[0-9]+$/def/",
        "/abc/regex(key= ^[0-9]+$)/def/",
    ] {
        let m = match_route(pattern, "/abc/123/def/");
        assert!(!m.matched, "{pattern} should not match");
        assert!(m.args.is_empty());
    }
}

#[test]
fn rejection_discards_partial_captures() {
    let m = match_route("/users/{id}/posts", "/users/42/comments");
    assert!(!m.matched);
    assert!(m.args.is_empty());
}

#[test]
fn capturing_route_tolerates_trailing_segments() {
    let m = match_route("/a/{id}", "/a/1/extra");
    assert!(m.matched);
    assert_eq!(args_of(&m), vec![("id", "1")]);

    assert!(!match_route("/a/b", "/a/b/extra").matched);
}

#[test]
fn shorter_request_path_is_rejected() {
    assert!(!match_route("/a/{id}/c", "/a/1").matched);
}

#[test]
fn literal_text_equal_to_placeholder_syntax() {
    let m = match_route("/a/{id}", "/a/{id}");
    assert!(m.matched);
    assert!(m.args.is_empty());
}

#[test]
fn match_path_accepts_string_segments() {
    let segments = path_segments("/home/docs");
    let m = match_path("/home/{path}", &segments);
    assert_eq!(m.args.get("path"), Some("docs"));
}
