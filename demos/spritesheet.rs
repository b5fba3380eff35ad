use packmax::{Heuristic, InputItem, MaxRectsPacker, PackError};

fn main() -> Result<(), PackError> {
    env_logger::init();

    let mut inputs: Vec<_> = (0..24)
        .map(|i| InputItem::new((64, 48), format!("sprite-{}", i)).with_padding(1))
        .collect();
    inputs.push(InputItem::new((300, 20), String::from("gradient")));
    inputs.push(InputItem::new((500, 500), String::from("backdrop")));

    let packer = MaxRectsPacker::new()
        .max_size((256, 256))
        .method(Heuristic::Automatic);
    let output = packer.pack(inputs)?;

    for (index, page) in output.pages().iter().enumerate() {
        println!(
            "Page {} ({}x{}, {}, {:.1}% full):",
            index,
            page.size().0,
            page.size().1,
            page.method(),
            page.occupancy() * 100.0
        );

        for item in page.items() {
            let (x, y) = item.position();
            let (w, h) = item.size();
            println!(
                "  {}: {}x{} at ({}, {}){}",
                item.payload(),
                w,
                h,
                x,
                y,
                if item.rotated() { ", rotated" } else { "" }
            );
        }
    }

    for item in output.not_packed() {
        println!("Too large for any page: {}", item.payload());
    }

    Ok(())
}
