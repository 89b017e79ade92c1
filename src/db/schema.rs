table! {
    articles (article_id) {
        article_id -> Integer,
        title -> Text,
        topic -> Text,
        author -> Text,
        body -> Text,
        created_at -> Timestamp,
        votes -> BigInt,
        article_img_url -> Text,
    }
}

table! {
    comments (comment_id) {
        comment_id -> Integer,
        article_id -> Integer,
        body -> Text,
        votes -> BigInt,
        author -> Text,
        created_at -> Timestamp,
    }
}

table! {
    topics (slug) {
        slug -> Text,
        description -> Text,
        img_url -> Text,
    }
}

table! {
    users (username) {
        username -> Text,
        name -> Text,
        avatar_url -> Text,
    }
}

joinable!(articles -> topics (topic));
joinable!(articles -> users (author));
joinable!(comments -> articles (article_id));
joinable!(comments -> users (author));

allow_tables_to_appear_in_same_query!(articles, comments, topics, users);
