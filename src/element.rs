pub fn outer_shell_electrons(atomic_num: u8) -> u8 {
    OUTER_ELECTRONS
        .get(atomic_num as usize)
        .copied()
        .unwrap_or(0)
}

static OUTER_ELECTRONS: [u8; 119] = [
    0,  // dummy
    1, 2,                                                       // H  He
    1, 2, 3, 4, 5, 6, 7, 8,                                    // Li Be B  C  N  O  F  Ne
    1, 2, 3, 4, 5, 6, 7, 8,                                    // Na Mg Al Si P  S  Cl Ar
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 3, 4, 5, 6, 7, 8, // K  Ca Sc..Zn Ga Ge As Se Br Kr
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 3, 4, 5, 6, 7, 8, // Rb Sr Y ..Cd In Sn Sb Te I  Xe
    1, 2,                                                       // Cs Ba
    3, 4, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14,            // La Ce..Yb
    3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 3, 4, 5, 6, 7, 8,       // Lu Hf..Hg Tl Pb Bi Po At Rn
    1, 2,                                                       // Fr Ra
    3, 4, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14,            // Ac Th..No
    3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 3, 4, 5, 6, 7, 8,       // Lr Rf..Cn Nh Fl Mc Lv Ts Og
];

/// Periodic table data for elements 1–118.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ar = 18,
    K = 19,
    Ca = 20,
    Sc = 21,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Kr = 36,
    Rb = 37,
    Sr = 38,
    Y = 39,
    Zr = 40,
    Nb = 41,
    Mo = 42,
    Tc = 43,
    Ru = 44,
    Rh = 45,
    Pd = 46,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Sb = 51,
    Te = 52,
    I = 53,
    Xe = 54,
    Cs = 55,
    Ba = 56,
    La = 57,
    Ce = 58,
    Pr = 59,
    Nd = 60,
    Pm = 61,
    Sm = 62,
    Eu = 63,
    Gd = 64,
    Tb = 65,
    Dy = 66,
    Ho = 67,
    Er = 68,
    Tm = 69,
    Yb = 70,
    Lu = 71,
    Hf = 72,
    Ta = 73,
    W = 74,
    Re = 75,
    Os = 76,
    Ir = 77,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
    Po = 84,
    At = 85,
    Rn = 86,
    Fr = 87,
    Ra = 88,
    Ac = 89,
    Th = 90,
    Pa = 91,
    U = 92,
    Np = 93,
    Pu = 94,
    Am = 95,
    Cm = 96,
    Bk = 97,
    Cf = 98,
    Es = 99,
    Fm = 100,
    Md = 101,
    No = 102,
    Lr = 103,
    Rf = 104,
    Db = 105,
    Sg = 106,
    Bh = 107,
    Hs = 108,
    Mt = 109,
    Ds = 110,
    Rg = 111,
    Cn = 112,
    Nh = 113,
    Fl = 114,
    Mc = 115,
    Lv = 116,
    Ts = 117,
    Og = 118,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        if (1..=118).contains(&n) {
            // SAFETY: Element is repr(u8) with variants 1..=118, and we checked bounds.
            Some(unsafe { std::mem::transmute::<u8, Element>(n) })
        } else {
            None
        }
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::At => &[1],
            Element::Si | Element::Ge => &[4],
            Element::P | Element::As => &[3, 5],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Electron-rich main-group elements gain valence with positive charge
    /// (N+ is tetravalent); electron-poor ones lose valence with any charge
    /// (C+ and C- are trivalent).
    pub fn is_electron_rich(self) -> bool {
        outer_shell_electrons(self.atomic_num()) >= 5 && !self.is_transition_like()
    }

    fn is_transition_like(self) -> bool {
        matches!(self.atomic_num(), 21..=30 | 39..=48 | 57..=80 | 89..=112)
    }

    /// Chalcogens that donate a lone pair to an aromatic ring when divalent.
    pub fn is_chalcogen_donor(self) -> bool {
        matches!(self, Element::O | Element::S | Element::Se | Element::Te)
    }

    /// Pnictogens that donate a lone pair to an aromatic ring when trivalent.
    pub fn is_pnictogen_donor(self) -> bool {
        matches!(self, Element::N | Element::P | Element::As)
    }
}
