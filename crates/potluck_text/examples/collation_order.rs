use potluck_text::{alphabetic_class, collate};

fn main() {
    let mut titles = vec![
        "Zucchini Bread",
        "Älplermagronen",
        "apple pie",
        "Banana Split",
        "banana",
        "Crème brûlée",
        "Cremona salad",
        "Øllebrød",
        "1-2-3 Cake",
    ];

    titles.sort_by(|a, b| collate(a, b));

    for title in titles {
        println!("{}  {}", alphabetic_class(title), title);
    }
}
