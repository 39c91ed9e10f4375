const PARAGRAPHS: [&str; 4] = [
    "Welcome to the Book Recommendation App! This app helps you explore popular books and discover new reads based on your preferences.",
    "Home Page: Browse the most popular books in a grid layout. Open any book to see its cover, author, number of ratings and average rating.",
    "Recommender Page: Enter the title of a book you like and the app suggests similar books using a K-Nearest Neighbors (KNN) model over reader ratings.",
    "Popularity-based browsing and a similarity-based recommender, side by side, to help you find your next great read. Happy reading!",
];

pub fn page() -> String {
    let mut html = String::from("<h3>About</h3>");
    for paragraph in PARAGRAPHS {
        html.push_str("<p>");
        html.push_str(paragraph);
        html.push_str("</p>");
    }
    html
}
