use pagescript_types::Color;

/// Encodes text for a Type1 font using WinAnsiEncoding. Characters with no
/// WinAnsi code become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        // 0x80..=0x9F are not Latin-1 in WinAnsi.
        c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
        _ => b'?',
    }
}

/// RGB components scaled to 0.0..=1.0, as PDF color operators expect.
pub fn rgb_components(color: &Color) -> [f32; 3] {
    let (r, g, b) = color.to_normalized();
    [r, g, b]
}
