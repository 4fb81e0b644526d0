use std::collections::HashMap;

use scene::SceneOptions;

pub struct CliOptions {
    pub use_multi_thread: bool,
    pub scene_name: String,
    pub width: u32,
    pub height: u32,
    pub bounding: bool,
    pub bounding_threshold: usize,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        let scene_options = SceneOptions::default();
        Self {
            use_multi_thread: true,
            scene_name: String::from("spheres"),
            width: 640,
            height: 480,
            bounding: scene_options.bounding,
            bounding_threshold: scene_options.bounding_threshold,
            help: false,
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"
        --use_multi_thread | --use_single_thread
        --scene_name <spheres|boxes_on_line|empty>
        --width <pixels> --height <pixels>
        --no_bounding
        --bounding_threshold <number of objects>
        "#
    }

    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            bounding: self.bounding,
            bounding_threshold: self.bounding_threshold,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}", key))?;
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid value {} for {}", value, key))
}

pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            Some(value) if !value.starts_with('-') => {
                let value = args.pop();
                pairs.insert(key, value);
            }
            _ => {
                pairs.insert(key, None);
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        match k.as_str() {
            "--use_multi_thread" => options.use_multi_thread = true,
            "--use_single_thread" => options.use_multi_thread = false,
            "--scene_name" => {
                options.scene_name = v.ok_or_else(|| String::from("Missing scene name"))?
            }
            "--width" => options.width = parse_number(&k, v)?,
            "--height" => options.height = parse_number(&k, v)?,
            "--no_bounding" => options.bounding = false,
            "--bounding_threshold" => options.bounding_threshold = parse_number(&k, v)?,
            "--help" => options.help = true,
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    if options.width == 0 || options.height == 0 {
        return Err(format!("Empty resolution {}x{}", options.width, options.height));
    }
    Ok(options)
}
