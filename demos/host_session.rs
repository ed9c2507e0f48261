//! Demo: session host yang memakai zbuff lewat dispatch by name
//!
//! Run dengan: cargo run --example host_session

use zbuff::host::{self, Created, HostValue, SEEK_CUR, SEEK_SET};
use zbuff::Config;

fn show(label: &str, out: &[HostValue]) {
    let parts: Vec<String> = out
        .iter()
        .map(|v| match v {
            HostValue::Nil => "nil".to_string(),
            HostValue::Integer(i) => i.to_string(),
            HostValue::Number(n) => n.to_string(),
            HostValue::Str(s) => format!("{:?}", String::from_utf8_lossy(s)),
        })
        .collect();
    println!("  {:<28} -> {}", label, parts.join(", "));
}

fn main() -> zbuff::Result<()> {
    println!("=== zbuff host session ===\n");

    let config = Config::default();
    let mut buf = match host::create(32, None, &config)? {
        Created::Handle(h) => h,
        Created::Rejected => {
            println!("capacity rejected");
            return Ok(());
        }
        Created::Failed(msg) => {
            println!("create failed: {}", msg);
            return Ok(());
        }
    };
    println!("[1] created buffer, capacity {}", buf.buffer().capacity());

    let args = [
        HostValue::from(">IIHA"),
        HostValue::Integer(0x1234),
        HostValue::Integer(0x4567),
        HostValue::Integer(0x12),
        HostValue::from("abcdefg"),
    ];
    show("pack(\">IIHA\", ...)", &buf.call("pack", &args)?);
    show("toStr(0, 17)", &buf.call("toStr", &[HostValue::Integer(0), HostValue::Integer(17)])?);

    show("seek(0, SEEK_SET)", &buf.call("seek", &[HostValue::Integer(0), HostValue::Integer(SEEK_SET)])?);
    show("unpack(\">IIHA7\")", &buf.call("unpack", &[">IIHA7".into()])?);

    println!("\n[2] typed accessors");
    show("writeF64(3.25)", &buf.call("writeF64", &[HostValue::Number(3.25)])?);
    show("seek(-8, SEEK_CUR)", &buf.call("seek", &[HostValue::Integer(-8), HostValue::Integer(SEEK_CUR)])?);
    show("readF64()", &buf.call("readF64", &[])?);
    show("writeI64(1) at end", &buf.call("writeI64", &[HostValue::Integer(1)])?);

    println!("\n[3] indexing");
    buf.new_index(0, 0x41)?;
    show("buf[0]", &buf.index(0)?.into_iter().collect::<Vec<_>>());
    show("buf[99]", &buf.index(99)?.into_iter().collect::<Vec<_>>());

    println!("\n[4] errors");
    if let Err(e) = buf.call("pack", &["Z".into()]) {
        println!("  pack(\"Z\")                    -> error: {}", e);
    }
    if let Err(e) = buf.call("resize", &[]) {
        println!("  resize()                     -> error: {}", e);
    }

    match host::create(0, None, &config)? {
        Created::Rejected => println!("  create(0)                    -> nothing"),
        _ => println!("  create(0)                    -> unexpected"),
    }

    println!("\n✅ Done");
    Ok(())
}
