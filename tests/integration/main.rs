//! airlock integration test harness.
//!
//! Exercises the public decoder and encoder end to end against captured
//! fragment streams and published vectors. Fixtures shared by every test
//! module live here.

mod failures;

use airlock_core::xoshiro::Xoshiro256;
use airlock_core::{Decoder, Encoder};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A 4-segment stream captured from a live QR exchange, in arrival order:
/// sequence numbers 9 through 21, each frame seen twice except the first.
/// Upper-case, as QR alphanumeric mode delivers it.
pub const CAPTURED_STREAM: [&str; 24] = [
    "UR:BYTES/9-4/LPASAACFADFXCYCMRTFYMNHDGYFWEEIDINEOGSFWEHFEJPGEECFPHKISFPIHEEHSJYGHFYFLJOJPKSHSFDJKIOHDFWGEFGFEGHJYEYIDJLKNEEGLFPEEHTEMFPHTGEJODLFNDYFREHFMDLDRDTDWJLJZIEIHJPDEEYDTDTDTCNESJSJNJNEEJPECKKAEVDGUYLLR",
    "UR:BYTES/10-4/LPBKAACFADFXCYCMRTFYMNHDGYJOIOESKKGRHSGREEGEKKJLHSFWIMHFHKGEGRGOFGHDESGRIEKKIDEEIYIOFGHSFGGOGYJNHTGLFLGOEMEHGYEHKTHTIOHTINFLGTEHFLJLEMJOECESGLHGDLFNDYFREHFMDLDRDWHSJTIEHEKODEKOFTJOJEDEHPIHDYFSOTGH",
    "UR:BYTES/10-4/LPBKAACFADFXCYCMRTFYMNHDGYJOIOESKKGRHSGREEGEKKJLHSFWIMHFHKGEGRGOFGHDESGRIEKKIDEEIYIOFGHSFGGOGYJNHTGLFLGOEMEHGYEHKTHTIOHTINFLGTEHFLJLEMJOECESGLHGDLFNDYFREHFMDLDRDWHSJTIEHEKODEKOFTJOJEDEHPIHDYFSOTGH",
    "UR:BYTES/11-4/LPBDAACFADFXCYCMRTFYMNHDGYFWEEIDINEOGSFWEHFEJPGEECFPHKISFPIHEEHSJYGHFYFLJOJPKSHSFDJKIOHDFWGEFGFEGHJYEYIDJLKNEEGLFPEEHTEMFPHTGEJODLFNDYFREHFMDLDRDTDWJLJZIEIHJPDEEYDTDTDTCNESJSJNJNEEJPECKKAEFYTKSRRP",
    "UR:BYTES/12-4/LPBNAACFADFXCYCMRTFYMNHDGYKGHGATHKAOKEJYCKJSGEJNCYJOKBFLJSFWCWGUGUASDYEMAHBEFNDIAXFHADFTJOETDLDIFTFZFXBKAEESKNLBDKLBBGIHASBYKKATHLGEKOFPHFINCYJZGYCAFHENHGECFZJSADIOKSLBBBJYDSAYGHLBGRHLECEEDIKOFMLF",
    "UR:BYTES/12-4/LPBNAACFADFXCYCMRTFYMNHDGYKGHGATHKAOKEJYCKJSGEJNCYJOKBFLJSFWCWGUGUASDYEMAHBEFNDIAXFHADFTJOETDLDIFTFZFXBKAEESKNLBDKLBBGIHASBYKKATHLGEKOFPHFINCYJZGYCAFHENHGECFZJSADIOKSLBBBJYDSAYGHLBGRHLECEEDIKOFMLF",
    "UR:BYTES/13-4/LPBTAACFADFXCYCMRTFYMNHDGYESIAIHDYEHDYENDLEEETDIDLEHDIDLDYDIDLEYDIHLJYJOKPIDFYFGGRGSIYIDEYJPINIDJTEEJSISJLFXGLEHIHGRFDGMFDGREOKTJPKOFGKNIOHGECFGKSEHGDHTEOGDEYHKEOGLGYHFEMGTHGIHESGRESISGSEENYFYFXMT",
    "UR:BYTES/13-4/LPBTAACFADFXCYCMRTFYMNHDGYESIAIHDYEHDYENDLEEETDIDLEHDIDLDYDIDLEYDIHLJYJOKPIDFYFGGRGSIYIDEYJPINIDJTEEJSISJLFXGLEHIHGRFDGMFDGREOKTJPKOFGKNIOHGECFGKSEHGDHTEOGDEYHKEOGLGYHFEMGTHGIHESGRESISGSEENYFYFXMT",
    "UR:BYTES/14-4/LPBAAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHFZLOPKKE",
    "UR:BYTES/14-4/LPBAAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHFZLOPKKE",
    "UR:BYTES/15-4/LPBSAACFADFXCYCMRTFYMNHDGYFWEEIDINEOGSFWEHFEJPGEECFPHKISFPIHEEHSJYGHFYFLJOJPKSHSFDJKIOHDFWGEFGFEGHJYEYIDJLKNEEGLFPEEHTEMFPHTGEJODLFNDYFREHFMDLDRDTDWJLJZIEIHJPDEEYDTDTDTCNESJSJNJNEEJPECKKAETPLNPMMU",
    "UR:BYTES/15-4/LPBSAACFADFXCYCMRTFYMNHDGYFWEEIDINEOGSFWEHFEJPGEECFPHKISFPIHEEHSJYGHFYFLJOJPKSHSFDJKIOHDFWGEFGFEGHJYEYIDJLKNEEGLFPEEHTEMFPHTGEJODLFNDYFREHFMDLDRDTDWJLJZIEIHJPDEEYDTDTDTCNESJSJNJNEEJPECKKAETPLNPMMU",
    "UR:BYTES/16-4/LPBEAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHLAAYMKEM",
    "UR:BYTES/16-4/LPBEAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHLAAYMKEM",
    "UR:BYTES/17-4/LPBYAACFADFXCYCMRTFYMNHDGYJPEHKBGHFRECIECEBAGOHNGWADJPJYATFNISCLFTHNDMGUGYGLJSCLFWAHEODNFXBSFTBNDPETINDAHYINGTAOECJLDAKBHKAHFZJOJLHEEMGOCXIHFNGWBBFZFWHKBZHLBABDKBFLKEISDRIMINFRHTJZBGENCNAMCSBGAYFR",
    "UR:BYTES/17-4/LPBYAACFADFXCYCMRTFYMNHDGYJPEHKBGHFRECIECEBAGOHNGWADJPJYATFNISCLFTHNDMGUGYGLJSCLFWAHEODNFXBSFTBNDPETINDAHYINGTAOECJLDAKBHKAHFZJOJLHEEMGOCXIHFNGWBBFZFWHKBZHLBABDKBFLKEISDRIMINFRHTJZBGENCNAMCSBGAYFR",
    "UR:BYTES/18-4/LPBGAACFADFXCYCMRTFYMNHDGYJPEHKBGHFRECIECEBAGOHNGWADJPJYATFNISCLFTHNDMGUGYGLJSCLFWAHEODNFXBSFTBNDPETINDAHYINGTAOECJLDAKBHKAHFZJOJLHEEMGOCXIHFNGWBBFZFWHKBZHLBABDKBFLKEISDRIMINFRHTJZBGENCNAMWDFZDSBE",
    "UR:BYTES/18-4/LPBGAACFADFXCYCMRTFYMNHDGYJPEHKBGHFRECIECEBAGOHNGWADJPJYATFNISCLFTHNDMGUGYGLJSCLFWAHEODNFXBSFTBNDPETINDAHYINGTAOECJLDAKBHKAHFZJOJLHEEMGOCXIHFNGWBBFZFWHKBZHLBABDKBFLKEISDRIMINFRHTJZBGENCNAMWDFZDSBE",
    "UR:BYTES/19-4/LPBWAACFADFXCYCMRTFYMNHDGYBDDYFMCXGACAFHDRFREOAOKGEYBBBYDEAYGDAMBZGYASKEHSINHYBWIHHDFLHPENJNKBGEHNBAAAHEEMAYDNGLGUDAKPFHHNHFEEENCYDAFPEHIAGDGHFRKBCLBSBTIYBDJLHPDPAMCMCWGRAOBAKBJTBSCXKPJTGYLBYABDDS",
    "UR:BYTES/19-4/LPBWAACFADFXCYCMRTFYMNHDGYBDDYFMCXGACAFHDRFREOAOKGEYBBBYDEAYGDAMBZGYASKEHSINHYBWIHHDFLHPENJNKBGEHNBAAAHEEMAYDNGLGUDAKPFHHNHFEEENCYDAFPEHIAGDGHFRKBCLBSBTIYBDJLHPDPAMCMCWGRAOBAKBJTBSCXKPJTGYLBYABDDS",
    "UR:BYTES/20-4/LPBBAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHCEFPYNBG",
    "UR:BYTES/20-4/LPBBAACFADFXCYCMRTFYMNHDGYEYGUHPBEKSDPASAHBSBDDAGHAXEOFMCSDLLBEEEYBNKIBNBBBDCYGODMBBCLESAACTCHDEBAFTKPEMHDGRIHLBENJTFSJNDECAATFPISGUATGRAAATHSKIAMBEHEHGGOHPHLAOCKFDFLGTKEGWHKCWHGFYCFCACPIHCEFPYNBG",
    "UR:BYTES/21-4/LPBZAACFADFXCYCMRTFYMNHDGYKGHGATHKAOKEJYCKJSGEJNCYJOKBFLJSFWCWGUGUASDYEMAHBEFNDIAXFHADFTJOETDLDIFTFZFXBKAEESKNLBDKLBBGIHASBYKKATHLGEKOFPHFINCYJZGYCAFHENHGECFZJSADIOKSLBBBJYDSAYGHLBGRHLECEELDWEGSST",
    "UR:BYTES/21-4/LPBZAACFADFXCYCMRTFYMNHDGYKGHGATHKAOKEJYCKJSGEJNCYJOKBFLJSFWCWGUGUASDYEMAHBEFNDIAXFHADFTJOETDLDIFTFZFXBKAEESKNLBDKLBBGIHASBYKKATHLGEKOFPHFINCYJZGYCAFHENHGECFZJSADIOKSLBBBJYDSAYGHLBGRHLECEELDWEGSST",
];

/// Output descriptor carried by `CAPTURED_STREAM`, inside a CBOR text header.
pub const CAPTURED_DESCRIPTOR: &str = "tr([65fb43fe/48'/1'/0'/2']tpubDFM6mziafLfJPA9StFuzvdC5htjaMTsVaPSAjsahgE4c2CMWpg9yKaK4JyoaBjVYJKUFX9Kdyb4fgFaFUQmZNGU71Q1wZgZiGM1Go7p59NW/<0;1>/*,and_v(v:pk([e9ce0106/48'/1'/0'/2']tpubDFKLfb2ribn4qhoCN1eKHRHK3wrvFzgW5Fx1PZ3P2Y3NQV7MWe9K9hL4B4bi3LB1ErJ5AYhAe4atTDGprxaHsgXBJFETt2boz4NA4Z7AZJp/<0;1>/*),older(2)))#9qmm4r5y";

pub const CAPTURED_CHECKSUM: u32 = 381_699_214;

/// The full decoded payload of `CAPTURED_STREAM`: CBOR head `79 01 40`
/// (text string, 320 bytes) followed by the descriptor.
pub fn captured_payload() -> Vec<u8> {
    let mut payload = vec![0x79, 0x01, 0x40];
    payload.extend_from_slice(CAPTURED_DESCRIPTOR.as_bytes());
    payload
}

/// Distinct fragments of `CAPTURED_STREAM`, first occurrence order.
pub fn captured_distinct() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for fragment in CAPTURED_STREAM {
        if !out.contains(&fragment) {
            out.push(fragment);
        }
    }
    out
}

/// 256 bytes from the "Wolf" seed wrapped as a CBOR byte string; the
/// message behind the published 9-part `ur:bytes` vectors.
pub fn wolf_cbor() -> Vec<u8> {
    let mut cbor = vec![0x59, 0x01, 0x00];
    cbor.extend(Xoshiro256::from_seed(b"Wolf").next_data(256));
    cbor
}

// ── Harness ───────────────────────────────────────────────────────────────────

/// `count` fragments of `message`, starting at sequence 1.
pub fn encode_stream(message: &[u8], max_fragment_len: usize, count: usize) -> Vec<String> {
    let mut encoder = Encoder::new("bytes", message, max_fragment_len).expect("encoder rejected message");
    (0..count).map(|_| encoder.next_part()).collect()
}

/// Feed fragments until the decoder completes. Returns the decoder and
/// the index of the fragment that completed it, if any.
pub fn feed<'a, I>(fragments: I) -> (Decoder, Option<usize>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut decoder = Decoder::new();
    for (i, fragment) in fragments.into_iter().enumerate() {
        decoder.receive(fragment);
        if decoder.is_complete() {
            return (decoder, Some(i));
        }
    }
    (decoder, None)
}
