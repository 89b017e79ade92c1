#![allow(dead_code)]

use diesel::connection::SimpleConnection;
use news::db;
use rocket::local::blocking::Client;

pub const ARTICLE_COUNT: i64 = 13;

static SEED: &str = "
INSERT INTO topics (slug, description, img_url) VALUES
    ('mitch', 'The man, the Mitch, the legend', ''),
    ('cats', 'Not dogs', ''),
    ('paper', 'what books are made of', '');

INSERT INTO users (username, name, avatar_url) VALUES
    ('butter_bridge', 'jonny', 'https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg'),
    ('icellusedkars', 'sam', 'https://avatars2.githubusercontent.com/u/24604688?s=460&v=4'),
    ('rogersop', 'paul', 'https://avatars2.githubusercontent.com/u/24394918?s=400&v=4'),
    ('lurker', 'do_nothing', 'https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png');

INSERT INTO articles (title, topic, author, body, created_at, votes, article_img_url) VALUES
    ('Living in the shadow of a great man', 'mitch', 'butter_bridge', 'I find this existence challenging', '2020-07-09 20:11:00', 100, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Sony Vaio; or, The Laptop', 'mitch', 'icellusedkars', 'Call me Mitchell.', '2020-10-16 05:03:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Eight pug gifs that remind me of mitch', 'mitch', 'icellusedkars', 'some gifs', '2020-11-03 09:12:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Student SUES Mitch!', 'mitch', 'rogersop', 'We all love Mitch and his wonderful, unique typing style.', '2020-05-06 01:14:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('UNCOVERED: catspiracy to bring down democracy', 'cats', 'rogersop', 'Bastet walks amongst us, and the cats are taking arms!', '2020-08-03 13:14:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('A', 'mitch', 'icellusedkars', 'Delicious tin of cat food', '2020-10-18 01:00:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Z', 'mitch', 'icellusedkars', 'I was hungry.', '2020-01-07 14:08:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Does Mitch predate civilisation?', 'mitch', 'icellusedkars', 'Archaeologists have uncovered a gigantic statue.', '2020-04-17 01:08:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('They''re not exactly dogs, are they?', 'mitch', 'butter_bridge', 'Well? Think about it.', '2020-06-06 09:10:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Seven inspirational thought leaders from Manchester UK', 'mitch', 'rogersop', 'Who are we kidding, there is only one, and it''s Mitch!', '2020-05-14 04:15:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Am I a cat?', 'mitch', 'icellusedkars', 'Having run out of ideas for articles, I am staring at the wall.', '2020-01-15 22:21:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Moustache', 'mitch', 'butter_bridge', 'Have you seen the size of that thing?', '2020-10-11 11:24:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700'),
    ('Another article about Mitch', 'mitch', 'butter_bridge', 'There will never be enough articles about Mitch!', '2020-10-11 11:24:00', 0, 'https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700');

INSERT INTO comments (article_id, body, votes, author, created_at) VALUES
    (9, 'Oh, I''ve got compassion running out of my nose, pal!', 16, 'butter_bridge', '2020-04-06 12:17:00'),
    (1, 'The beautiful thing about treasure is that it exists.', 14, 'butter_bridge', '2020-10-31 03:03:00'),
    (1, 'Replacing the quiet elegance of the dark suit and tie.', 100, 'icellusedkars', '2020-03-01 01:13:00'),
    (1, ' I carry a log - yes. Is it funny to you? It is not to me.', -100, 'icellusedkars', '2020-02-23 12:01:00'),
    (1, 'I hate streaming noses', 0, 'icellusedkars', '2020-11-03 21:00:00'),
    (6, 'I hate streaming eyes even more', 0, 'icellusedkars', '2020-04-11 21:02:00'),
    (1, 'Lobster pot', 0, 'icellusedkars', '2020-05-15 20:19:00'),
    (1, 'Delicious crackerbreads', 0, 'icellusedkars', '2020-04-14 20:19:00'),
    (1, 'Superficially charming', 0, 'icellusedkars', '2020-01-01 03:08:00'),
    (3, 'git push origin master', 0, 'icellusedkars', '2020-06-20 07:24:00'),
    (3, 'Ambidextrous marsupial', 0, 'icellusedkars', '2020-09-19 23:10:00'),
    (1, 'Massive intercranial brain haemorrhage', 0, 'icellusedkars', '2020-03-02 07:10:00'),
    (1, 'Fruit pastilles', 0, 'icellusedkars', '2020-06-15 10:25:00'),
    (5, 'What do you see? I have no idea where this will lead us.', 16, 'icellusedkars', '2020-06-09 05:00:00'),
    (5, 'I am 100% sure that we''re not completely sure.', 1, 'butter_bridge', '2020-11-24 00:08:00'),
    (1, 'This is a bad article name', 1, 'butter_bridge', '2020-10-11 15:23:00'),
    (9, 'This morning, I showered for nine minutes.', 16, 'icellusedkars', '2020-07-21 00:20:00'),
    (1, 'Lorem ipsum dolor sit amet.', 0, 'butter_bridge', '2020-08-15 17:45:00');
";

/// A client over a fresh, seeded in-memory database.
pub fn client() -> Client {
    let pool = db::build_pool(db::MEMORY, 1).expect("Failed to create database pool");
    {
        let mut conn = pool.get().expect("Failed to get a connection");
        db::create_schema(&mut conn).expect("Failed to create schema");
        conn.batch_execute(SEED).expect("Failed to seed database");
    }
    Client::tracked(news::rocket(pool)).expect("valid rocket instance")
}
